use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{contact::Contact, route::Route};

/// Cache tied to one position of the session history. Displaying the route
/// of its position again needs nothing but this record, as long as the cached
/// identities still match.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contacts: Option<Vec<Contact>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub flags: BTreeMap<String, Value>,
}

/// A write to exactly one field, merged onto the latest entry.
#[derive(Clone, Debug, PartialEq)]
pub enum Patch {
    Contact(Option<Contact>),
    Contacts(Option<Vec<Contact>>),
    Flag(String, Option<Value>),
}

impl NavigationEntry {
    pub fn apply(&mut self, patch: Patch) {
        match patch {
            Patch::Contact(contact) => self.contact = contact,
            Patch::Contacts(contacts) => self.contacts = contacts,
            Patch::Flag(key, Some(value)) => {
                self.flags.insert(key, value);
            }
            Patch::Flag(key, None) => {
                self.flags.remove(&key);
            }
        }
    }

    pub fn flag_str(&self, key: &str) -> Option<&str> {
        self.flags.get(key).and_then(|value| value.as_str())
    }

    /// The entry a push from `from` to `to` starts with. The contact list and
    /// its flags survive while both routes show the sidebar with the same
    /// query; the focused contact survives only between contact pages.
    pub fn carry_forward(&self, from: &Route, to: &Route) -> Self {
        let keep_contacts = from.has_sidebar() && to.has_sidebar() && from.query == to.query;
        let keep_contact = from.is_contact_page() && to.is_contact_page();

        Self {
            contacts: if keep_contacts {
                self.contacts.clone()
            } else {
                None
            },
            contact: if keep_contact {
                self.contact.clone()
            } else {
                None
            },
            flags: if keep_contacts {
                self.flags.clone()
            } else {
                BTreeMap::new()
            },
        }
    }

    pub fn references(&self, id: &str) -> bool {
        let in_contacts = self
            .contacts
            .as_ref()
            .is_some_and(|contacts| contacts.iter().any(|contact| contact.id == id));

        let is_contact = self.contact.as_ref().is_some_and(|contact| contact.id == id);

        in_contacts || is_contact
    }

    /// Replaces (or drops) the focused contact with the given id and drops any
    /// list containing it, so it gets fetched again. Returns whether anything
    /// changed.
    pub fn invalidate_contact(&mut self, id: &str, replacement: Option<&Contact>) -> bool {
        let mut changed = false;
        if self.contact.as_ref().is_some_and(|contact| contact.id == id) {
            self.contact = replacement.cloned();
            changed = true;
        }

        let listed = self
            .contacts
            .as_ref()
            .is_some_and(|contacts| contacts.iter().any(|contact| contact.id == id));

        if listed {
            self.contacts = None;
            changed = true;
        }

        changed
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use crate::location::Location;

    use super::*;

    fn route(value: &str) -> Route {
        Route::resolve(&Location::parse(value).expect("valid location"))
    }

    fn entry() -> NavigationEntry {
        let mut entry = NavigationEntry {
            contacts: Some(vec![Contact::new("1"), Contact::new("4")]),
            contact: Some(Contact::new("4")),
            ..Default::default()
        };
        entry.apply(Patch::Flag("query".to_string(), Some(json!("al"))));
        entry
    }

    #[test]
    fn carry_forward_keeps_list_into_contact_detail() {
        let carried = entry().carry_forward(&route("/?q=al"), &route("/contacts/1?q=al"));
        assert!(carried.contacts.is_some());
        assert_eq!(Some("al"), carried.flag_str("query"));
        assert!(carried.contact.is_none());

        let carried = entry().carry_forward(&route("/contacts/4"), &route("/contacts/4/edit"));
        assert_eq!(Some(Contact::new("4")), carried.contact);
    }

    #[test]
    fn carry_forward_drops_list_on_query_change_or_leaving_sidebar() {
        let carried = entry().carry_forward(&route("/?q=al"), &route("/?q=alex"));
        assert!(carried.contacts.is_none());
        assert!(carried.flags.is_empty());

        let carried = entry().carry_forward(&route("/contacts/4"), &route("/about"));
        assert_eq!(NavigationEntry::default(), carried);
    }

    #[test]
    fn invalidate_contact_drops_stale_references() {
        let mut entry = entry();
        assert!(entry.references("4"));
        assert!(entry.invalidate_contact("4", None));
        assert!(!entry.references("4"));
        assert!(entry.contacts.is_none());
        assert!(entry.contact.is_none());

        let mut untouched = entry.clone();
        assert!(!untouched.invalidate_contact("9", None));
        assert_eq!(entry, untouched);
    }

    #[test]
    fn invalidate_contact_replaces_focused_record() {
        let mut entry = NavigationEntry {
            contact: Some(Contact::new("4")),
            ..Default::default()
        };

        let mut updated = Contact::new("4");
        updated.favorite = true;

        assert!(entry.invalidate_contact("4", Some(&updated)));
        assert_eq!(Some(updated), entry.contact);
    }

    #[test]
    fn flag_patches_insert_and_remove() {
        let mut entry = NavigationEntry::default();
        entry.apply(Patch::Flag("query".to_string(), Some(json!("al"))));
        assert_eq!(Some("al"), entry.flag_str("query"));

        entry.apply(Patch::Flag("query".to_string(), None));
        assert!(entry.flags.is_empty());
    }
}
