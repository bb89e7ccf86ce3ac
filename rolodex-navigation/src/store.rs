use crate::{
    contact::Contact,
    entry::{NavigationEntry, Patch},
    error::NavigationError,
    history::SessionHistory,
    location::Location,
    route::Route,
};

/// Sole owner of the session history. Every write goes through here, reads
/// deserialize the current record and writes serialize, so stored state is
/// plain json at all times.
#[derive(Debug)]
pub struct HistoryStore {
    generation: u64,
    session: SessionHistory,
    version: u64,
}

impl HistoryStore {
    pub fn new(location: Location, entry: &NavigationEntry) -> Result<Self, NavigationError> {
        Ok(Self {
            generation: 0,
            session: SessionHistory::new(location, serde_json::to_value(entry)?),
            version: 0,
        })
    }

    pub fn session(&self) -> &SessionHistory {
        &self.session
    }

    pub fn location(&self) -> &Location {
        &self.session.current().location
    }

    pub fn route(&self) -> Route {
        Route::resolve(self.location())
    }

    /// Increases with every write, including pointer moves.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Increases with every invalidation. Data fetched under an older
    /// generation may predate a mutation and must not be written back.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn read(&self) -> NavigationEntry {
        let state = &self.session.current().state;
        match serde_json::from_value(state.clone()) {
            Ok(entry) => entry,
            Err(error) => {
                tracing::warn!("history state unreadable, using empty entry: {:?}", error);
                NavigationEntry::default()
            }
        }
    }

    pub fn push(&mut self, location: Location, entry: &NavigationEntry) -> Result<(), NavigationError> {
        tracing::debug!("push history: {}", location);

        self.session.push(location, serde_json::to_value(entry)?);
        self.version += 1;

        Ok(())
    }

    /// Merges the patches onto the latest entry of the current position.
    pub fn replace(&mut self, patches: Vec<Patch>) -> Result<u64, NavigationError> {
        let mut entry = self.read();
        for patch in patches {
            entry.apply(patch);
        }

        self.session.replace_state(serde_json::to_value(&entry)?);
        self.version += 1;

        tracing::trace!("replaced history state, version {}", self.version);

        Ok(self.version)
    }

    pub fn replace_query(&mut self, location: Location) -> Result<(), NavigationError> {
        let current = self.location();
        if current.path != location.path {
            return Err(NavigationError::PathChanged(
                current.path.clone(),
                location.path,
            ));
        }

        tracing::debug!("replace history location: {}", location);

        self.session.replace_location(location);
        self.version += 1;

        Ok(())
    }

    /// Applies [`NavigationEntry::invalidate_contact`] to every retained
    /// record and starts a new generation. Returns the number of records
    /// changed.
    pub fn invalidate_contact(
        &mut self,
        id: &str,
        replacement: Option<&Contact>,
    ) -> Result<usize, NavigationError> {
        self.generation += 1;

        let mut changed = 0;
        for record in self.session.records_mut() {
            let mut entry: NavigationEntry = match serde_json::from_value(record.state.clone()) {
                Ok(entry) => entry,
                Err(error) => {
                    tracing::warn!("skipping unreadable history state: {:?}", error);
                    continue;
                }
            };

            if entry.invalidate_contact(id, replacement) {
                record.state = serde_json::to_value(&entry)?;
                changed += 1;
            }
        }

        if changed > 0 {
            self.version += 1;
        }

        tracing::debug!(
            "invalidated contact {} in {} history records, generation {}",
            id,
            changed,
            self.generation
        );

        Ok(changed)
    }

    pub fn back(&mut self) -> bool {
        let moved = self.session.back();
        if moved {
            self.version += 1;
        }
        moved
    }

    pub fn forward(&mut self) -> bool {
        let moved = self.session.forward();
        if moved {
            self.version += 1;
        }
        moved
    }
}
