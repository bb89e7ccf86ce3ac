use url::Url;

use crate::{
    entry::NavigationEntry, error::NavigationError, location::Location, route::Route,
    store::HistoryStore,
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NavigationEvent {
    Back,
    Click { href: String, modified: bool },
    Forward,
    Navigate(String),
    PopState,
}

/// Broadcast to every outlet. Observed, never queued.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Signal {
    Navigated,
    Replaced { writer: String, version: u64 },
}

impl Signal {
    pub fn is_written_by(&self, name: &str) -> bool {
        matches!(self, Signal::Replaced { writer, .. } if writer == name)
    }
}

/// Single dispatch point turning link clicks and history moves into signals.
#[derive(Clone, Debug)]
pub struct NavigationBus {
    origin: Url,
    ignored: Vec<String>,
}

impl NavigationBus {
    pub fn new(origin: Url, ignored: Vec<String>) -> Self {
        Self { origin, ignored }
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// The in app location behind `href`, or `None` if the browser should
    /// handle it by itself.
    pub fn intercept(&self, current: &Location, href: &str) -> Option<Location> {
        let base = match self.origin.join(&current.to_string()) {
            Ok(it) => it,
            Err(error) => {
                tracing::warn!("current location not joinable: {:?}", error);
                return None;
            }
        };

        let url = match base.join(href) {
            Ok(it) => it,
            Err(error) => {
                tracing::debug!("ignoring unparsable href {:?}: {:?}", href, error);
                return None;
            }
        };

        if url.origin() != self.origin.origin() {
            tracing::trace!("ignoring cross origin href: {}", url);
            return None;
        }

        let location = Location::from_url(&url);
        if self
            .ignored
            .iter()
            .any(|prefix| is_under(&location.path, prefix))
        {
            tracing::trace!("ignoring href under ignored prefix: {}", location);
            return None;
        }

        Some(location)
    }

    #[tracing::instrument(skip(self, store))]
    pub fn dispatch(
        &self,
        store: &mut HistoryStore,
        event: &NavigationEvent,
    ) -> Result<Option<Signal>, NavigationError> {
        match event {
            NavigationEvent::Back => Ok(store.back().then_some(Signal::Navigated)),
            NavigationEvent::Click { href, modified } => {
                if *modified {
                    return Ok(None);
                }

                self.follow(store, href)
            }
            NavigationEvent::Forward => Ok(store.forward().then_some(Signal::Navigated)),
            NavigationEvent::Navigate(href) => self.follow(store, href),
            NavigationEvent::PopState => Ok(Some(Signal::Navigated)),
        }
    }

    /// Pushes `location` with the still valid part of the current entry.
    pub fn navigate(
        &self,
        store: &mut HistoryStore,
        location: Location,
    ) -> Result<Signal, NavigationError> {
        let entry = store
            .read()
            .carry_forward(&store.route(), &Route::resolve(&location));

        self.navigate_with(store, location, &entry)
    }

    pub fn navigate_with(
        &self,
        store: &mut HistoryStore,
        location: Location,
        entry: &NavigationEntry,
    ) -> Result<Signal, NavigationError> {
        store.push(location, entry)?;
        Ok(Signal::Navigated)
    }

    fn follow(
        &self,
        store: &mut HistoryStore,
        href: &str,
    ) -> Result<Option<Signal>, NavigationError> {
        match self.intercept(store.location(), href) {
            Some(location) => Ok(Some(self.navigate(store, location)?)),
            None => Ok(None),
        }
    }
}

/// `path` is `prefix` itself or lies below it, segment wise.
fn is_under(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
