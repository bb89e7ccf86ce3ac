use rolodex_navigation::{Contact, Location, NavigationEntry, Patch, Route};
use rolodex_template::directive::Directive;
use serde_json::Value;

use crate::{indicator, task::Task};

use super::{DataLoader, Identity, OutletId, Payload, RenderContext, Renderer};

pub const QUERY_FLAG: &str = "query";

/// The contact list, keyed by the search query it was fetched for.
pub struct ContactsLoader;

impl DataLoader for ContactsLoader {
    fn requested(&self, route: &Route) -> Option<Identity> {
        if route.has_sidebar() {
            Some(Identity::Contacts(route.query.clone()))
        } else {
            None
        }
    }

    fn cached(&self, entry: &NavigationEntry) -> Option<Identity> {
        entry.contacts.as_ref()?;

        let query = entry.flag_str(QUERY_FLAG).map(|query| query.to_string());
        Some(Identity::Contacts(query))
    }

    fn request(&self, outlet: OutletId, identity: &Identity, generation: u64) -> Option<Task> {
        match identity {
            Identity::Contacts(query) => Some(Task::FetchContacts {
                outlet,
                query: query.clone(),
                generation,
            }),
            Identity::Contact(_) | Identity::Static => None,
        }
    }

    fn patches(&self, identity: &Identity, payload: Payload) -> Vec<Patch> {
        match (identity, payload) {
            (Identity::Contacts(query), Payload::Contacts(contacts)) => vec![
                Patch::Contacts(Some(contacts)),
                Patch::Flag(QUERY_FLAG.to_string(), query.clone().map(Value::String)),
            ],
            (identity, payload) => {
                tracing::warn!(
                    "contact list got unexpected payload for {:?}: {:?}",
                    identity,
                    payload
                );
                Vec::new()
            }
        }
    }
}

pub struct SidebarRenderer;

impl Renderer for SidebarRenderer {
    fn render(&self, context: &RenderContext) -> Directive {
        let searching = indicator::is_searching(context.route, context.phase);
        let query = context.search.map(|search| search.to_string()).or(context.route.query.clone());

        let contacts = context.entry.contacts.as_ref().map(|contacts| {
            if contacts.is_empty() {
                Directive::new("no-contacts")
            } else {
                Directive::new("contacts").with(
                    "items",
                    contacts
                        .iter()
                        .map(|contact| item(context, contact))
                        .collect::<Vec<_>>(),
                )
            }
        });

        Directive::new("sidebar-layout")
            .with("query", query)
            .with("searching", searching.then_some("loading"))
            .with("idle", !searching)
            .with("contacts", contacts)
            .with(
                "detail-class",
                context.details_loading.then_some("loading"),
            )
            .with("details", context.details.clone())
    }
}

fn item(context: &RenderContext, contact: &Contact) -> Directive {
    let location = Location::default()
        .with_path(&format!("/contacts/{}", contact.id))
        .with_query_value("q", context.route.query.as_deref());

    let name = match contact.full() {
        Some(full) => Directive::new("item-name").with("full", full),
        None => Directive::new("no-name"),
    };

    Directive::new("contact-item")
        .with("href", location.to_string())
        .with(
            "class",
            indicator::item_class(context.route, context.entry, &contact.id),
        )
        .with("name", name)
        .with("star", contact.favorite.then(|| Directive::new("star")))
}
