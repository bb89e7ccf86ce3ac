use rolodex_navigation::{Location, NavigationEntry, NavigationEvent, Signal};

use crate::{action::Action, model::Model};

use super::outlet;

pub fn dispatch(model: &mut Model, event: &NavigationEvent) -> Vec<Action> {
    match model.bus.dispatch(&mut model.store, event) {
        Ok(Some(signal)) => navigated(model, &signal),
        Ok(None) => {
            tracing::debug!("navigation left to the browser: {:?}", event);
            Vec::new()
        }
        Err(error) => {
            tracing::error!("navigation failed: {:?}", error);
            Vec::new()
        }
    }
}

/// Pushes `location` with whatever the current entry can hand over.
pub fn navigate(model: &mut Model, location: Location) -> Vec<Action> {
    match model.bus.navigate(&mut model.store, location) {
        Ok(signal) => navigated(model, &signal),
        Err(error) => {
            tracing::error!("navigation failed: {:?}", error);
            Vec::new()
        }
    }
}

pub fn navigate_with(
    model: &mut Model,
    location: Location,
    entry: &NavigationEntry,
) -> Vec<Action> {
    match model.bus.navigate_with(&mut model.store, location, entry) {
        Ok(signal) => navigated(model, &signal),
        Err(error) => {
            tracing::error!("navigation failed: {:?}", error);
            Vec::new()
        }
    }
}

/// Swaps the query of the current record in place, the search path.
pub fn replace_query(model: &mut Model, location: Location) -> Vec<Action> {
    match model.store.replace_query(location) {
        Ok(()) => navigated(model, &Signal::Navigated),
        Err(error) => {
            tracing::error!("replacing query failed: {:?}", error);
            Vec::new()
        }
    }
}

pub fn back(model: &mut Model) -> Vec<Action> {
    dispatch(model, &NavigationEvent::Back)
}

fn navigated(model: &mut Model, signal: &Signal) -> Vec<Action> {
    if model.search.typed.take().is_some() {
        model.search.generation += 1;
    }

    outlet::broadcast(model, signal)
}
