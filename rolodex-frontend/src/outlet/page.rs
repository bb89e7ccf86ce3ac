use rolodex_navigation::{NavigationEntry, Page, Patch, Route};
use rolodex_template::directive::Directive;

use crate::task::Task;

use super::{DataLoader, Identity, OutletId, Payload, RenderContext, Renderer};

/// Outlets without data. They are ready as soon as their route is active.
pub struct StaticLoader {
    active: fn(&Route) -> bool,
}

impl StaticLoader {
    pub fn about() -> Self {
        Self {
            active: |route| route.page == Page::About,
        }
    }

    /// Fallback for the sidebar detail region.
    pub fn home() -> Self {
        Self {
            active: Route::has_sidebar,
        }
    }
}

impl DataLoader for StaticLoader {
    fn requested(&self, route: &Route) -> Option<Identity> {
        (self.active)(route).then_some(Identity::Static)
    }

    fn cached(&self, _: &NavigationEntry) -> Option<Identity> {
        Some(Identity::Static)
    }

    fn request(&self, _: OutletId, _: &Identity, _: u64) -> Option<Task> {
        None
    }

    fn patches(&self, _: &Identity, _: Payload) -> Vec<Patch> {
        Vec::new()
    }
}

pub struct StaticRenderer {
    template: &'static str,
}

impl StaticRenderer {
    pub fn new(template: &'static str) -> Self {
        Self { template }
    }
}

impl Renderer for StaticRenderer {
    fn render(&self, _: &RenderContext) -> Directive {
        Directive::new(self.template)
    }
}
