use rolodex_navigation::{Contact, NavigationEntry, Page, Patch, Route};
use rolodex_template::directive::Directive;

use crate::task::Task;

use super::{DataLoader, Identity, OutletId, Payload, RenderContext, Renderer};

/// A single contact for the page it is bound to, keyed by the contact id.
pub struct ContactLoader {
    page: Page,
}

impl ContactLoader {
    pub fn contact() -> Self {
        Self {
            page: Page::Contact,
        }
    }

    pub fn edit() -> Self {
        Self {
            page: Page::EditContact,
        }
    }
}

impl DataLoader for ContactLoader {
    fn requested(&self, route: &Route) -> Option<Identity> {
        if route.page != self.page {
            return None;
        }

        route.id.clone().map(Identity::Contact)
    }

    fn cached(&self, entry: &NavigationEntry) -> Option<Identity> {
        entry
            .contact
            .as_ref()
            .map(|contact| Identity::Contact(contact.id.clone()))
    }

    fn request(&self, outlet: OutletId, identity: &Identity, generation: u64) -> Option<Task> {
        match identity {
            Identity::Contact(id) => Some(Task::FetchContact {
                outlet,
                id: id.clone(),
                generation,
            }),
            Identity::Contacts(_) | Identity::Static => None,
        }
    }

    fn patches(&self, identity: &Identity, payload: Payload) -> Vec<Patch> {
        match payload {
            Payload::Contact(contact) => vec![Patch::Contact(Some(contact))],
            Payload::Contacts(_) => {
                tracing::warn!("contact got a list payload for {:?}", identity);
                Vec::new()
            }
        }
    }
}

pub struct ContactRenderer;

impl Renderer for ContactRenderer {
    fn render(&self, context: &RenderContext) -> Directive {
        let directive = Directive::new("contact-page");
        let contact = match &context.entry.contact {
            Some(it) => it,
            None => return directive,
        };

        let name = match contact.full() {
            Some(full) => Directive::new("name").with("full", full),
            None => Directive::new("no-name"),
        };

        directive
            .with("id", contact.id.as_str())
            .with("avatar", contact.avatar.as_deref())
            .with("name", name)
            .with("favorite", favorite(contact))
            .with(
                "twitter",
                contact
                    .twitter
                    .as_deref()
                    .filter(|twitter| !twitter.is_empty())
                    .map(|twitter| Directive::new("twitter").with("handle", twitter)),
            )
            .with(
                "notes",
                contact
                    .notes
                    .as_deref()
                    .filter(|notes| !notes.is_empty())
                    .map(|notes| Directive::new("notes").with("text", notes)),
            )
    }
}

fn favorite(contact: &Contact) -> Directive {
    let (label, text) = if contact.favorite {
        ("Remove from favorites", "★")
    } else {
        ("Add to favorites", "☆")
    };

    Directive::new("toggle-favorite")
        .with("label", label)
        .with("value", (!contact.favorite).to_string())
        .with("text", text)
}

pub struct EditContactRenderer;

impl Renderer for EditContactRenderer {
    fn render(&self, context: &RenderContext) -> Directive {
        let directive = Directive::new("edit-contact");
        match &context.entry.contact {
            Some(contact) => directive
                .with("id", contact.id.as_str())
                .with("first", contact.first.as_deref().unwrap_or_default())
                .with("last", contact.last.as_deref().unwrap_or_default())
                .with("twitter", contact.twitter.as_deref().unwrap_or_default())
                .with("avatar", contact.avatar.as_deref().unwrap_or_default())
                .with("notes", contact.notes.as_deref().unwrap_or_default()),
            None => directive,
        }
    }
}
