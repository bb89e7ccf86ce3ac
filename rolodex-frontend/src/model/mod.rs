use rolodex_navigation::{HistoryStore, NavigationBus};
use rolodex_template::{node::Fragment, Catalog};

use crate::{outlet::Outlets, settings::Settings, slot::Slot};

#[derive(Debug)]
pub struct Model {
    pub alert: Option<String>,
    pub bus: NavigationBus,
    pub catalog: Catalog,
    pub document: Fragment,
    pub outlets: Outlets,
    pub page_loaded: bool,
    pub search: SearchState,
    pub settings: Settings,
    pub splash: Option<Slot>,
    pub store: HistoryStore,
}

/// Typed search text waiting for its debounce to settle.
#[derive(Debug, Default)]
pub struct SearchState {
    pub generation: u64,
    pub typed: Option<String>,
}
