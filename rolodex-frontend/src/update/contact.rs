use rolodex_navigation::{Location, NavigationEntry, Page, Route, Signal};

use crate::{
    action::Action,
    api::Fields,
    event::Mutation,
    model::Model,
    task::Task,
};

use super::{navigation, outlet};

const STORE_WRITER: &str = "store";

pub fn edit(model: &mut Model) -> Vec<Action> {
    let route = model.store.route();
    match contact_id(&route, Page::Contact) {
        Some(id) => {
            let location = model
                .store
                .location()
                .with_path(&format!("/contacts/{}/edit", id));

            navigation::navigate(model, location)
        }
        None => ignored("edit", &route),
    }
}

pub fn cancel(model: &mut Model) -> Vec<Action> {
    let route = model.store.route();
    if route.page != Page::EditContact {
        return ignored("cancel", &route);
    }

    navigation::back(model)
}

pub fn save(model: &mut Model, fields: Fields) -> Vec<Action> {
    let route = model.store.route();
    match contact_id(&route, Page::EditContact) {
        Some(id) => vec![Action::Task(Task::UpdateContact(id, fields))],
        None => ignored("save", &route),
    }
}

pub fn delete(model: &mut Model) -> Vec<Action> {
    let route = model.store.route();
    match contact_id(&route, Page::Contact) {
        Some(id) => vec![Action::Task(Task::DeleteContact(id))],
        None => ignored("delete", &route),
    }
}

pub fn favorite(model: &mut Model) -> Vec<Action> {
    let route = model.store.route();
    let contact = match (contact_id(&route, Page::Contact), model.store.read().contact) {
        (Some(id), Some(contact)) if contact.id == id => contact,
        _ => return ignored("favorite", &route),
    };

    vec![Action::Task(Task::SetFavorite(
        contact.id,
        !contact.favorite,
    ))]
}

/// Applies a successful server side change to every retained history entry
/// and moves on to where the change leads.
#[tracing::instrument(skip(model))]
pub fn mutated(model: &mut Model, mutation: Mutation) -> Vec<Action> {
    match mutation {
        Mutation::Created(contact) => {
            let location = Location::default().with_path(&format!("/contacts/{}/edit", contact.id));
            navigation::navigate_with(model, location, &NavigationEntry::default())
        }
        Mutation::Deleted(id) => {
            if let Err(error) = model.store.invalidate_contact(&id, None) {
                tracing::error!("invalidating contact {} failed: {:?}", id, error);
            }

            let query = model.store.route().query;
            let location = Location::default().with_query_value("q", query.as_deref());
            navigation::navigate(model, location)
        }
        Mutation::Favorited(contact) => {
            if let Err(error) = model.store.invalidate_contact(&contact.id, Some(&contact)) {
                tracing::error!("invalidating contact {} failed: {:?}", contact.id, error);
            }

            let signal = Signal::Replaced {
                writer: STORE_WRITER.to_string(),
                version: model.store.version(),
            };
            outlet::broadcast(model, &signal)
        }
        Mutation::Updated(contact) => {
            if let Err(error) = model.store.invalidate_contact(&contact.id, Some(&contact)) {
                tracing::error!("invalidating contact {} failed: {:?}", contact.id, error);
            }

            let location = model
                .store
                .location()
                .with_path(&format!("/contacts/{}", contact.id));

            let mut entry = model
                .store
                .read()
                .carry_forward(&model.store.route(), &Route::resolve(&location));
            entry.contact = Some(contact);

            navigation::navigate_with(model, location, &entry)
        }
    }
}

fn contact_id(route: &Route, page: Page) -> Option<String> {
    if route.page == page {
        route.id.clone()
    } else {
        None
    }
}

fn ignored(command: &str, route: &Route) -> Vec<Action> {
    tracing::warn!("{} is not available on {:?}", command, route.page);
    Vec::new()
}
