use std::{fs, path::Path};

use rolodex_navigation::{HistoryStore, Location, NavigationBus, NavigationEntry};
use rolodex_template::Catalog;
use url::Url;

use crate::{error::AppError, model::Model, outlet::Outlets, settings::Settings};

const DEFAULT_TEMPLATES: &str = include_str!("view/templates.html");

pub fn model(settings: Settings) -> Result<Model, AppError> {
    let catalog = load_catalog(settings.templates.as_deref())?;
    let entry = load_initial_state(settings.initial_state.as_deref())?;
    let location = Location::parse(&settings.location)?;

    tracing::debug!("starting at {} with {:?}", location, entry);

    Ok(Model {
        alert: None,
        bus: NavigationBus::new(Url::parse(&settings.origin)?, settings.ignored_paths.clone()),
        catalog,
        document: Vec::new(),
        outlets: Outlets::default(),
        page_loaded: false,
        search: Default::default(),
        settings,
        splash: None,
        store: HistoryStore::new(location, &entry)?,
    })
}

pub fn load_catalog(path: Option<&Path>) -> Result<Catalog, AppError> {
    let source = match path {
        Some(path) => fs::read_to_string(path)?,
        None => DEFAULT_TEMPLATES.to_string(),
    };

    let catalog = Catalog::parse(&source)?;
    tracing::trace!("loaded templates: {:?}", catalog.names());

    Ok(catalog)
}

/// Server prefetched data for the first history entry.
pub fn load_initial_state(path: Option<&Path>) -> Result<NavigationEntry, AppError> {
    match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&content)?)
        }
        None => Ok(NavigationEntry::default()),
    }
}
