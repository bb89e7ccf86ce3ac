use crate::{
    action::Action,
    event::{Envelope, Message, MessageSource},
    model::Model,
    task::Task,
};

mod contact;
mod navigation;
pub mod outlet;
mod search;

#[tracing::instrument(skip(model))]
pub fn update_model(model: &mut Model, envelope: Envelope) -> Vec<Action> {
    let Envelope { messages, source } = envelope;

    let mut actions = Vec::new();
    for message in messages {
        if model.alert.is_some() && source == MessageSource::User && !is_alert_input(&message) {
            tracing::warn!("skipping user input while alert is open: {:?}", message);
            continue;
        }

        actions.extend(update_with_message(model, message));
    }
    actions
}

/// Startup: every outlet evaluates the initial location once.
pub fn start(model: &mut Model) -> Vec<Action> {
    outlet::broadcast(model, &rolodex_navigation::Signal::Navigated)
}

fn is_alert_input(message: &Message) -> bool {
    matches!(message, Message::DismissAlert | Message::Quit)
}

#[tracing::instrument(skip(model))]
fn update_with_message(model: &mut Model, message: Message) -> Vec<Action> {
    match message {
        Message::CancelEdit => contact::cancel(model),
        Message::CreateContact => vec![Action::Task(Task::CreateContact)],
        Message::DeleteContact => contact::delete(model),
        Message::DismissAlert => {
            model.alert = None;
            Vec::new()
        }
        Message::EditContact => contact::edit(model),
        Message::Loaded {
            outlet,
            identity,
            generation,
            result,
        } => outlet::landed(model, outlet, identity, generation, result),
        Message::Mutated(Ok(mutation)) => contact::mutated(model, mutation),
        Message::Mutated(Err(error)) => {
            tracing::error!("contact change failed: {:?}", error);
            model.alert = Some(error.to_string());
            Vec::new()
        }
        Message::Navigation(event) => navigation::dispatch(model, &event),
        Message::Quit => vec![Action::Quit],
        Message::SaveContact(fields) => contact::save(model, fields),
        Message::Search(text) => search::changed(model, text),
        Message::SearchSettled { generation, query } => search::settled(model, generation, query),
        Message::ToggleFavorite => contact::favorite(model),
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use rolodex_navigation::Page;

    use crate::{
        api::ApiError,
        outlet::{Identity, OutletId, Outlets, Payload, Phase},
        slot::{self, Slot},
        testing::{address_book, contact, Harness},
    };

    use super::*;

    fn loaded(location: &str) -> Harness {
        let mut harness = Harness::start(location, address_book());
        harness.settle();
        harness.api.clear_requests();
        harness
    }

    fn assert_slots(harness: &Harness) {
        let model = &harness.model;
        let slots = |ids: &[OutletId]| -> Vec<(OutletId, Option<Slot>)> {
            ids.iter()
                .filter_map(|id| model.outlets.get(*id))
                .map(|outlet| (outlet.id, outlet.state.slot))
                .collect()
        };

        let mut top: Vec<_> = slots(&Outlets::TOP_LEVEL[..])
            .into_iter()
            .map(|(_, slot)| ((), slot))
            .collect();
        top.push(((), model.splash));
        assert!(slot::content_holders(&top) <= 1, "top level: {:?}", top);

        let details = slots(&Outlets::DETAILS[..]);
        let holders = slot::content_holders(&details);
        if model.outlets.is_active(OutletId::Sidebar) {
            assert_eq!(1, holders, "details: {:?}", details);
        } else {
            assert_eq!(0, holders, "details: {:?}", details);
        }
    }

    #[test]
    fn first_paint_shows_splash_until_list_is_loaded() {
        let mut harness = Harness::start("/", address_book());

        assert!(harness.find("loading-splash").is_some());
        assert!(harness.find("root").is_none());
        assert_eq!(
            vec![Task::FetchContacts {
                outlet: OutletId::Sidebar,
                query: None,
                generation: 0,
            }],
            harness.pending.iter().cloned().collect::<Vec<_>>()
        );

        harness.settle();

        assert!(harness.model.page_loaded);
        assert!(harness.find("loading-splash").is_none());
        assert!(harness.find("zero-state").is_some());
        assert!(harness.html().contains("Alex Anderson"));
        assert_eq!(vec!["GET /contacts".to_string()], harness.requests());
    }

    #[test]
    fn back_and_forward_restore_without_fetching() {
        let mut harness = loaded("/");
        let mut frames = vec![harness.html()];

        for href in ["/contacts/1", "/contacts/2", "/about"] {
            harness.click(href);
            harness.settle();
            assert_slots(&harness);
            frames.push(harness.html());
        }

        let requests = harness.requests();
        assert_eq!(
            vec![
                "GET /contacts/1".to_string(),
                "GET /contacts/2".to_string()
            ],
            requests
        );

        for frame in frames.iter().rev().skip(1) {
            harness.back();
            assert!(harness.pending.is_empty());
            assert_slots(&harness);
            assert_eq!(frame, &harness.html());
        }

        for frame in frames.iter().skip(1) {
            harness.forward();
            assert!(harness.pending.is_empty());
            assert_eq!(frame, &harness.html());
        }

        assert_eq!(requests, harness.requests());
    }

    #[test]
    fn cached_contact_is_not_fetched_again() {
        let mut harness = loaded("/");
        harness.click("/contacts/1");
        harness.settle();
        harness.api.clear_requests();

        harness.click("/contacts/1/edit");

        assert!(harness.pending.is_empty());
        assert!(harness.requests().is_empty());
        assert_eq!(
            Phase::Ready(Identity::Contact("1".to_string())),
            harness
                .model
                .outlets
                .get(OutletId::EditContact)
                .expect("edit outlet")
                .phase
        );
        assert!(harness.find("contact-form").is_some());
        assert_slots(&harness);
    }

    #[test]
    fn superseded_contact_is_discarded_in_any_landing_order() {
        for first in ["1", "2"] {
            let mut harness = loaded("/");
            harness.click("/contacts/1");
            harness.click("/contacts/2");
            assert_eq!(2, harness.pending.len());

            harness.resolve_where(|task| {
                matches!(task, Task::FetchContact { id, .. } if id == first)
            });
            harness.settle();

            let entry = harness.model.store.read();
            assert_eq!(Some("2"), entry.contact.as_ref().map(|c| c.id.as_str()));
            assert!(harness
                .text("contact")
                .expect("contact region")
                .contains("Brooks Lybrand"));
            assert!(!harness.text("contact").expect("contact region").contains("Alex"));
            assert_slots(&harness);
        }
    }

    #[test]
    fn stale_contact_stays_visible_while_next_is_pending() {
        let mut harness = loaded("/contacts/1");
        harness.click("/contacts/2");

        let sidebar = harness.find("root").expect("sidebar");
        assert!(sidebar.has_attribute("pending"));
        assert!(harness.text("contact").expect("contact").contains("Alex"));

        let pending = node_with_class(&harness, "pending");
        assert_eq!(Some("/contacts/2".to_string()), pending);

        harness.settle();

        assert!(!harness.find("root").expect("sidebar").has_attribute("pending"));
        assert_eq!(
            Some("/contacts/2".to_string()),
            node_with_class(&harness, "active")
        );
    }

    fn node_with_class(harness: &Harness, class: &str) -> Option<String> {
        rolodex_template::node::find(&harness.visible(), |element| {
            element.attribute("class") == Some(class)
        })
        .and_then(|element| element.attribute("href").map(|href| href.to_string()))
    }

    #[test]
    fn create_opens_edit_form_after_fetching_new_contact() {
        let mut harness = loaded("/");
        harness.send(Message::CreateContact);
        harness.resolve_where(|task| *task == Task::CreateContact);

        assert_eq!("/contacts/7/edit", harness.location());
        assert!(harness.find("contact-form").is_none());
        assert!(harness.pending.iter().any(|task| matches!(
            task,
            Task::FetchContact {
                outlet: OutletId::EditContact,
                id,
                ..
            } if id == "7"
        )));

        harness.settle();

        assert!(harness.find("contact-form").is_some());
        let requests = harness.requests();
        assert_eq!(Some(&"POST /contacts".to_string()), requests.first());
        assert!(requests.contains(&"GET /contacts/7".to_string()));
        assert_slots(&harness);
    }

    #[test]
    fn save_updates_every_entry_and_shows_contact() {
        let mut harness = loaded("/");
        harness.click("/contacts/1");
        harness.settle();
        harness.send(Message::EditContact);
        assert_eq!("/contacts/1/edit", harness.location());

        let mut fields = crate::api::Fields::new();
        fields.insert("first".to_string(), "Alexandra".to_string());
        harness.send(Message::SaveContact(fields));
        harness.settle();

        assert_eq!("/contacts/1", harness.location());
        assert!(harness
            .text("contact")
            .expect("contact")
            .contains("Alexandra Anderson"));
        assert!(harness
            .text("sidebar")
            .expect("sidebar")
            .contains("Alexandra Anderson"));

        harness.back();
        harness.back();
        harness.settle();
        assert_eq!("/contacts/1", harness.location());
        assert!(!harness.html().contains("Alex Anderson"));
    }

    #[test]
    fn cancel_returns_to_previous_entry() {
        let mut harness = loaded("/contacts/1");
        harness.send(Message::EditContact);
        harness.send(Message::CancelEdit);

        assert_eq!("/contacts/1", harness.location());
        assert!(harness.find("contact").is_some());
        assert!(harness.pending.is_empty());
    }

    #[test]
    fn first_search_pushes_later_searches_replace() {
        let mut harness = loaded("/");

        harness.send(Message::Search("a".to_string()));
        harness.send(Message::Search("al".to_string()));
        harness.settle();

        assert_eq!("/?q=al", harness.location());
        assert_eq!(2, harness.model.store.session().len());
        assert_eq!(vec!["GET /contacts?query=al".to_string()], harness.requests());
        assert!(harness.html().contains("Alex Anderson"));
        assert!(!harness.html().contains("Brooks Lybrand"));

        harness.send(Message::Search("aex".to_string()));
        harness.settle();

        assert_eq!("/?q=aex", harness.location());
        assert_eq!(2, harness.model.store.session().len());
        assert_eq!(
            Some(&"GET /contacts?query=aex".to_string()),
            harness.requests().last()
        );

        harness.send(Message::Search(String::new()));
        harness.settle();

        assert_eq!("/", harness.location());
        assert_eq!(2, harness.model.store.session().len());
        assert_eq!(Some(&"GET /contacts".to_string()), harness.requests().last());
    }

    #[test]
    fn search_spinner_shows_while_query_loads() {
        let mut harness = loaded("/");
        harness.send(Message::Search("al".to_string()));
        harness.resolve_where(|task| matches!(task, Task::Debounce { .. }));

        let spinner = harness.find("search-spinner").expect("spinner");
        assert!(!spinner.has_attribute("hidden"));

        harness.settle();

        let spinner = harness.find("search-spinner").expect("spinner");
        assert!(spinner.has_attribute("hidden"));
    }

    #[test]
    fn delete_removes_contact_from_every_entry() {
        let mut harness = loaded("/");
        harness.click("/contacts/4");
        harness.settle();
        assert!(harness.html().contains("Dana Jackson"));

        harness.send(Message::DeleteContact);
        harness.settle();

        assert_eq!("/", harness.location());
        assert!(harness.requests().contains(&"DELETE /contacts/4".to_string()));
        assert!(harness
            .model
            .store
            .session()
            .records()
            .iter()
            .all(|record| !record.state.to_string().contains("Dana")));
        assert!(!harness.html().contains("Dana"));

        harness.back();
        assert!(!harness.html().contains("Dana"));
        harness.settle();
        assert!(!harness.html().contains("Dana"));
        assert!(matches!(
            harness
                .model
                .outlets
                .get(OutletId::Contact)
                .expect("contact outlet")
                .phase,
            Phase::Failed(_)
        ));

        harness.back();
        harness.settle();
        assert!(!harness.html().contains("Dana"));
    }

    #[test]
    fn favorite_refreshes_contact_and_list() {
        let mut harness = loaded("/contacts/1");
        assert!(!harness.html().contains("★"));

        harness.send(Message::ToggleFavorite);
        harness.settle();

        assert!(harness
            .requests()
            .contains(&"PUT /contacts/1/favorite".to_string()));
        assert!(harness
            .model
            .store
            .read()
            .contact
            .is_some_and(|contact| contact.favorite));
        assert!(harness.html().contains("Remove from favorites"));
        assert!(harness.text("sidebar").expect("sidebar").contains('★'));
    }

    #[test]
    fn failed_mutation_blocks_user_input_until_dismissed() {
        let mut harness = loaded("/");
        harness
            .api
            .fail_with(Some(ApiError::Transport("offline".to_string())));

        harness.send(Message::CreateContact);
        harness.settle();
        assert!(harness.model.alert.is_some());

        harness.click("/about");
        assert_eq!("/", harness.location());

        harness.send(Message::DismissAlert);
        harness.api.fail_with(None);
        harness.click("/about");
        assert_eq!("/about", harness.location());
        assert!(harness.model.alert.is_none());
    }

    #[test]
    fn failed_read_renders_without_data_and_retries_on_navigation() {
        let mut harness = Harness::start("/", address_book());
        harness
            .api
            .fail_with(Some(ApiError::Status {
                status: 500,
                body: "down".to_string(),
            }));
        harness.settle();

        let sidebar = harness.model.outlets.get(OutletId::Sidebar).expect("sidebar");
        assert_eq!(Phase::Failed(Identity::Contacts(None)), sidebar.phase);
        assert!(harness.pending.is_empty());
        assert!(harness.find("root").is_some());
        assert!(harness.find("loading-splash").is_none());

        harness.api.fail_with(None);
        harness.click("/");
        harness.settle();

        assert!(harness.html().contains("Alex Anderson"));
    }

    #[test]
    fn own_write_with_normalized_identity_does_not_refetch() {
        let mut harness = loaded("/contacts/4");
        harness.click("/contacts/04");
        harness.pending.clear();

        harness.receive(Message::Loaded {
            outlet: OutletId::Contact,
            identity: Identity::Contact("04".to_string()),
            generation: harness.model.store.generation(),
            result: Ok(Payload::Contact(contact("4", "Dana", "Jackson"))),
        });

        assert!(harness.pending.is_empty());
        assert_eq!(
            Phase::Ready(Identity::Contact("04".to_string())),
            harness
                .model
                .outlets
                .get(OutletId::Contact)
                .expect("contact outlet")
                .phase
        );
    }

    fn is_list_fetch(task: &Task) -> bool {
        matches!(task, Task::FetchContacts { .. })
    }

    #[test]
    fn list_fetched_before_delete_is_discarded_when_landing_after() {
        let mut harness = loaded("/contacts/4");

        harness.send(Message::ToggleFavorite);
        harness.resolve_where(|task| matches!(task, Task::SetFavorite(..)));
        let stale = harness.run_where(is_list_fetch);
        assert!(harness.pending.is_empty());

        harness.send(Message::DeleteContact);
        harness.resolve_where(|task| matches!(task, Task::DeleteContact(_)));

        assert_eq!("/", harness.location());
        assert!(harness.pending.iter().any(is_list_fetch));

        harness.receive(stale);
        assert!(!harness.html().contains("Dana"));
        assert_eq!(None, harness.model.store.read().contacts);

        harness.settle();
        assert!(!harness.html().contains("Dana"));
        assert!(harness.html().contains("Alex Anderson"));
    }

    #[test]
    fn list_fetched_before_update_is_discarded_when_landing_after() {
        let mut harness = loaded("/contacts/1");

        harness.send(Message::ToggleFavorite);
        harness.resolve_where(|task| matches!(task, Task::SetFavorite(..)));
        let stale = harness.run_where(is_list_fetch);

        harness.send(Message::EditContact);
        assert_eq!("/contacts/1/edit", harness.location());
        assert!(harness.pending.is_empty());

        let mut fields = crate::api::Fields::new();
        fields.insert("first".to_string(), "Alexandra".to_string());
        harness.send(Message::SaveContact(fields));
        harness.resolve_where(|task| matches!(task, Task::UpdateContact(..)));

        assert_eq!("/contacts/1", harness.location());
        assert!(harness.pending.iter().any(is_list_fetch));

        harness.receive(stale);
        assert!(!harness.html().contains("Alex Anderson"));

        harness.settle();
        let sidebar = harness.text("sidebar").expect("sidebar");
        assert!(sidebar.contains("Alexandra Anderson"));
        assert!(!sidebar.contains("Alex Anderson"));
    }

    #[test]
    fn quit_stops_even_while_alert_is_open() {
        let mut harness = loaded("/");
        harness.model.alert = Some("failed".to_string());

        harness.send(Message::Quit);
        assert!(harness.quit);
    }

    #[test]
    fn contact_commands_are_ignored_off_contact_pages() {
        let mut harness = loaded("/");
        harness.send(Message::DeleteContact);
        harness.send(Message::ToggleFavorite);
        harness.send(Message::EditContact);

        assert!(harness.pending.is_empty());
        assert_eq!(Page::Home, harness.model.store.route().page);
        assert!(harness.requests().is_empty());
    }
}
