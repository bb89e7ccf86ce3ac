use serde_json::Value;

use crate::location::Location;

#[derive(Clone, Debug, PartialEq)]
pub struct HistoryRecord {
    pub location: Location,
    pub state: Value,
}

/// In process model of the browser session history: a stack of records and
/// a pointer. Pushing discards every record ahead of the pointer.
#[derive(Clone, Debug)]
pub struct SessionHistory {
    records: Vec<HistoryRecord>,
    index: usize,
}

impl SessionHistory {
    pub fn new(location: Location, state: Value) -> Self {
        Self {
            records: vec![HistoryRecord { location, state }],
            index: 0,
        }
    }

    pub fn current(&self) -> &HistoryRecord {
        &self.records[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn records_mut(&mut self) -> impl Iterator<Item = &mut HistoryRecord> {
        self.records.iter_mut()
    }

    pub fn push(&mut self, location: Location, state: Value) {
        let discarded = self.records.len() - self.index - 1;
        if discarded > 0 {
            tracing::trace!("discarding {} forward history records", discarded);
        }

        self.records.truncate(self.index + 1);
        self.records.push(HistoryRecord { location, state });
        self.index = self.records.len() - 1;
    }

    pub fn replace_state(&mut self, state: Value) {
        self.records[self.index].state = state;
    }

    pub fn replace_location(&mut self, location: Location) {
        self.records[self.index].location = location;
    }

    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }

        self.index -= 1;
        true
    }

    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.records.len() {
            return false;
        }

        self.index += 1;
        true
    }
}
