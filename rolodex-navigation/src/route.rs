use std::sync::LazyLock;

use regex::Regex;

use crate::location::Location;

static CONTACT_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/contacts/([^/]+)(/edit)?/?$").expect("valid contact regex"));

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Page {
    About,
    Contact,
    EditContact,
    Home,
    Unknown,
}

/// Derived from a location, never stored.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Route {
    pub page: Page,
    pub id: Option<String>,
    pub query: Option<String>,
}

impl Route {
    pub fn resolve(location: &Location) -> Self {
        let query = location
            .query_value("q")
            .filter(|query| !query.is_empty());

        let (page, id) = match location.path.as_str() {
            "/" => (Page::Home, None),
            "/about" | "/about/" => (Page::About, None),
            path => match CONTACT_PATH.captures(path) {
                Some(captures) => {
                    let id = captures.get(1).map(|id| id.as_str().to_string());
                    if captures.get(2).is_some() {
                        (Page::EditContact, id)
                    } else {
                        (Page::Contact, id)
                    }
                }
                None => (Page::Unknown, None),
            },
        };

        Self { page, id, query }
    }

    pub fn has_sidebar(&self) -> bool {
        matches!(self.page, Page::Home | Page::Contact | Page::EditContact)
    }

    pub fn is_contact_page(&self) -> bool {
        matches!(self.page, Page::Contact | Page::EditContact)
    }
}
