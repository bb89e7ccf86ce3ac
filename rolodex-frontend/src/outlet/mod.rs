use std::collections::HashMap;

use rolodex_navigation::{Contact, NavigationEntry, Patch, Route};
use rolodex_template::directive::Directive;

use crate::{slot::Slot, task::Task};

mod contact;
mod contacts;
mod page;

pub use contact::{ContactLoader, ContactRenderer, EditContactRenderer};
pub use contacts::{ContactsLoader, SidebarRenderer};
pub use page::{StaticLoader, StaticRenderer};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum OutletId {
    About,
    Contact,
    EditContact,
    Home,
    Sidebar,
}

impl OutletId {
    pub fn name(&self) -> &'static str {
        match self {
            OutletId::About => "about",
            OutletId::Contact => "contact",
            OutletId::EditContact => "edit-contact",
            OutletId::Home => "home",
            OutletId::Sidebar => "sidebar",
        }
    }
}

/// What an outlet needs loaded to display the current route.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Identity {
    Contact(String),
    Contacts(Option<String>),
    Static,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Phase {
    #[default]
    Inactive,
    Loading(Identity),
    Ready(Identity),
    Failed(Identity),
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct OutletState {
    pub active: bool,
    pub slot: Option<Slot>,
    pub loading: bool,
    pub pending: bool,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Payload {
    Contact(Contact),
    Contacts(Vec<Contact>),
}

pub trait DataLoader: Send {
    /// `None` if the outlet has nothing to show for the route.
    fn requested(&self, route: &Route) -> Option<Identity>;
    fn cached(&self, entry: &NavigationEntry) -> Option<Identity>;
    /// The fetch for `identity`, tagged with the cache generation it starts
    /// under.
    fn request(&self, outlet: OutletId, identity: &Identity, generation: u64) -> Option<Task>;
    fn patches(&self, identity: &Identity, payload: Payload) -> Vec<Patch>;

    fn has_data(&self, entry: &NavigationEntry) -> bool {
        self.cached(entry).is_some()
    }
}

pub struct RenderContext<'a> {
    pub route: &'a Route,
    pub entry: &'a NavigationEntry,
    pub phase: &'a Phase,
    pub search: Option<&'a str>,
    pub details: Vec<Directive>,
    pub details_loading: bool,
}

pub trait Renderer: Send {
    fn render(&self, context: &RenderContext) -> Directive;
}

pub struct Outlet {
    pub id: OutletId,
    pub phase: Phase,
    pub state: OutletState,
    pub ready_once: bool,
    /// Identities being fetched, with the cache generation of the fetch.
    pub in_flight: HashMap<Identity, u64>,
    pub written: Option<Identity>,
    loader: Box<dyn DataLoader>,
    renderer: Box<dyn Renderer>,
}

impl std::fmt::Debug for Outlet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Outlet")
            .field("id", &self.id)
            .field("phase", &self.phase)
            .field("state", &self.state)
            .field("in_flight", &self.in_flight)
            .finish()
    }
}

impl Outlet {
    pub fn new(id: OutletId, loader: Box<dyn DataLoader>, renderer: Box<dyn Renderer>) -> Self {
        Self {
            id,
            phase: Phase::Inactive,
            state: OutletState::default(),
            ready_once: false,
            in_flight: HashMap::new(),
            written: None,
            loader,
            renderer,
        }
    }

    pub fn requested(&self, route: &Route) -> Option<Identity> {
        self.loader.requested(route)
    }

    pub fn cached(&self, entry: &NavigationEntry) -> Option<Identity> {
        self.loader.cached(entry)
    }

    pub fn has_data(&self, entry: &NavigationEntry) -> bool {
        self.loader.has_data(entry)
    }

    pub fn request(&self, identity: &Identity, generation: u64) -> Option<Task> {
        self.loader.request(self.id, identity, generation)
    }

    pub fn patches(&self, identity: &Identity, payload: Payload) -> Vec<Patch> {
        self.loader.patches(identity, payload)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.phase, Phase::Failed(_))
    }

    /// The outlet's directive with its region state as attributes, `None`
    /// while inactive.
    pub fn render(&self, context: &RenderContext) -> Option<Directive> {
        if !self.state.active {
            return None;
        }

        let directive = self
            .renderer
            .render(context)
            .with("slot", self.state.slot.map(|slot| slot.as_str()))
            .with("loading", self.state.loading)
            .with("pending", self.state.pending);

        Some(directive)
    }
}

/// All outlets of the app in document order.
#[derive(Debug)]
pub struct Outlets {
    outlets: Vec<Outlet>,
}

impl Default for Outlets {
    fn default() -> Self {
        Self {
            outlets: vec![
                Outlet::new(
                    OutletId::Sidebar,
                    Box::new(ContactsLoader),
                    Box::new(SidebarRenderer),
                ),
                Outlet::new(
                    OutletId::About,
                    Box::new(StaticLoader::about()),
                    Box::new(StaticRenderer::new("about-page")),
                ),
                Outlet::new(
                    OutletId::Home,
                    Box::new(StaticLoader::home()),
                    Box::new(StaticRenderer::new("home-page")),
                ),
                Outlet::new(
                    OutletId::Contact,
                    Box::new(ContactLoader::contact()),
                    Box::new(ContactRenderer),
                ),
                Outlet::new(
                    OutletId::EditContact,
                    Box::new(ContactLoader::edit()),
                    Box::new(EditContactRenderer),
                ),
            ],
        }
    }
}

impl Outlets {
    pub const TOP_LEVEL: [OutletId; 2] = [OutletId::Sidebar, OutletId::About];
    pub const DETAILS: [OutletId; 3] = [OutletId::Home, OutletId::Contact, OutletId::EditContact];

    pub fn get(&self, id: OutletId) -> Option<&Outlet> {
        self.outlets.iter().find(|outlet| outlet.id == id)
    }

    pub fn get_mut(&mut self, id: OutletId) -> Option<&mut Outlet> {
        self.outlets.iter_mut().find(|outlet| outlet.id == id)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Outlet> {
        self.outlets.iter_mut()
    }

    pub fn is_active(&self, id: OutletId) -> bool {
        self.get(id).is_some_and(|outlet| outlet.state.active)
    }

    pub fn is_loading(&self, id: OutletId) -> bool {
        self.get(id).is_some_and(|outlet| outlet.state.loading)
    }
}
