use std::collections::VecDeque;

use futures::executor::block_on;
use rolodex_navigation::{Contact, NavigationEvent};
use rolodex_template::node::{self, Element, Fragment};

use crate::{
    action::Action,
    api::MemoryContactApi,
    event::{Envelope, Message, MessageSource},
    init,
    model::Model,
    settings::Settings,
    task::{run_task, Task},
    update::{self, update_model},
    view,
};

/// Drives the model like the event loop does, but resolves tasks only when
/// asked to. Debounces settle immediately.
pub struct Harness {
    pub api: MemoryContactApi,
    pub model: Model,
    pub pending: VecDeque<Task>,
    pub quit: bool,
}

impl Harness {
    pub fn start(location: &str, api: MemoryContactApi) -> Self {
        let settings = Settings {
            location: location.to_string(),
            ..Default::default()
        };

        let mut harness = Self {
            api,
            model: init::model(settings).expect("model"),
            pending: VecDeque::new(),
            quit: false,
        };

        let actions = update::start(&mut harness.model);
        harness.execute(actions);
        harness
    }

    pub fn send(&mut self, message: Message) {
        self.deliver(message, MessageSource::User);
    }

    pub fn click(&mut self, href: &str) {
        self.send(Message::Navigation(NavigationEvent::Click {
            href: href.to_string(),
            modified: false,
        }));
    }

    pub fn back(&mut self) {
        self.send(Message::Navigation(NavigationEvent::Back));
    }

    pub fn forward(&mut self) {
        self.send(Message::Navigation(NavigationEvent::Forward));
    }

    /// Resolves pending tasks in order until none are left.
    pub fn settle(&mut self) {
        while let Some(task) = self.pending.pop_front() {
            self.resolve(task);
        }
    }

    /// Resolves the first pending task matching `predicate`.
    pub fn resolve_where<F>(&mut self, predicate: F)
    where
        F: Fn(&Task) -> bool,
    {
        let task = self.take_where(predicate);
        self.resolve(task);
    }

    /// Runs the first pending task matching `predicate` against the api now,
    /// but holds back its message so it can land later through `receive`.
    pub fn run_where<F>(&mut self, predicate: F) -> Message
    where
        F: Fn(&Task) -> bool,
    {
        let task = self.take_where(predicate);
        block_on(run_task(&self.api, task))
    }

    fn take_where<F>(&mut self, predicate: F) -> Task
    where
        F: Fn(&Task) -> bool,
    {
        let index = self
            .pending
            .iter()
            .position(predicate)
            .expect("matching pending task");

        self.pending.remove(index).expect("pending task")
    }

    pub fn requests(&self) -> Vec<String> {
        self.api.requests()
    }

    pub fn location(&self) -> String {
        self.model.store.location().to_string()
    }

    pub fn html(&self) -> String {
        view::html(&self.model)
    }

    pub fn visible(&self) -> Fragment {
        view::visible(&self.model.document)
    }

    pub fn find(&self, id: &str) -> Option<Element> {
        node::find(&self.visible(), |element| element.attribute("id") == Some(id)).cloned()
    }

    pub fn text(&self, id: &str) -> Option<String> {
        self.find(id).map(|element| element.text())
    }

    /// Delivers a message as if a task had produced it.
    pub fn receive(&mut self, message: Message) {
        self.deliver(message, MessageSource::Task);
    }

    fn resolve(&mut self, task: Task) {
        let message = match task {
            Task::Debounce {
                generation, query, ..
            } => Message::SearchSettled { generation, query },
            task => block_on(run_task(&self.api, task)),
        };

        self.deliver(message, MessageSource::Task);
    }

    fn deliver(&mut self, message: Message, source: MessageSource) {
        let actions = update_model(
            &mut self.model,
            Envelope {
                messages: vec![message],
                source,
            },
        );
        self.execute(actions);
    }

    fn execute(&mut self, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::Quit => self.quit = true,
                Action::Task(task) => self.pending.push_back(task),
            }
        }

        view::render_model(&mut self.model).expect("rendered");
    }
}

pub fn contact(id: &str, first: &str, last: &str) -> Contact {
    Contact {
        id: id.to_string(),
        first: Some(first.to_string()),
        last: Some(last.to_string()),
        ..Default::default()
    }
}

pub fn address_book() -> MemoryContactApi {
    MemoryContactApi::new(vec![
        contact("1", "Alex", "Anderson"),
        contact("2", "Brooks", "Lybrand"),
        contact("3", "Cameron", "Matheson"),
        contact("4", "Dana", "Jackson"),
        contact("5", "Glenn", "Reyes"),
        contact("6", "Ryan", "Florence"),
    ])
}
