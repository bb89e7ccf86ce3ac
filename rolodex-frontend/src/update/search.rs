use crate::{action::Action, model::Model, task::Task};

use super::navigation;

/// Typing restarts the debounce, only the last generation settles.
pub fn changed(model: &mut Model, text: String) -> Vec<Action> {
    model.search.generation += 1;
    model.search.typed = Some(text.clone());

    vec![Action::Task(Task::Debounce {
        generation: model.search.generation,
        query: text,
        delay: model.settings.debounce,
    })]
}

/// The first query of a visit pushes a history entry, every following change
/// replaces it.
pub fn settled(model: &mut Model, generation: u64, query: String) -> Vec<Action> {
    if generation != model.search.generation {
        tracing::trace!("search superseded: {:?}", query);
        return Vec::new();
    }

    let route = model.store.route();
    if !route.has_sidebar() {
        model.search.typed = None;
        return Vec::new();
    }

    let query = Some(query.trim().to_string()).filter(|query| !query.is_empty());
    if query == route.query {
        model.search.typed = None;
        return Vec::new();
    }

    let location = model
        .store
        .location()
        .with_query_value("q", query.as_deref());

    tracing::debug!("search settled: {}", location);

    if route.query.is_none() {
        navigation::navigate(model, location)
    } else {
        navigation::replace_query(model, location)
    }
}
