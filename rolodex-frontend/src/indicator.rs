use rolodex_navigation::{NavigationEntry, Route};

use crate::{
    model::Model,
    outlet::{OutletId, Outlets, Phase},
};

/// Derives loading and pending flags of every outlet and the page load state
/// from their phases. Runs after every evaluation.
pub fn update(model: &mut Model, route: &Route, entry: &NavigationEntry) {
    let pending = is_pending(route, entry);
    for outlet in model.outlets.iter_mut() {
        outlet.state.loading = outlet.state.active && matches!(outlet.phase, Phase::Loading(_));
        outlet.state.pending = outlet.id == OutletId::Sidebar && outlet.state.active && pending;
    }

    if !model.page_loaded && is_page_loaded(&model.outlets) {
        tracing::debug!("page loaded");
        model.page_loaded = true;
    }
}

/// Every top level outlet the route needs has been ready once. Sticks once
/// reached.
pub fn is_page_loaded(outlets: &Outlets) -> bool {
    let mut required = Outlets::TOP_LEVEL
        .iter()
        .filter_map(|id| outlets.get(*id))
        .filter(|outlet| outlet.state.active)
        .peekable();

    required.peek().is_some() && required.all(|outlet| outlet.ready_once)
}

/// The route points at a contact other than the one currently rendered.
pub fn is_pending(route: &Route, entry: &NavigationEntry) -> bool {
    if !route.is_contact_page() {
        return false;
    }

    let rendered = entry.contact.as_ref().map(|contact| contact.id.as_str());
    route.id.as_deref() != rendered
}

pub fn is_searching(route: &Route, phase: &Phase) -> bool {
    route.query.is_some() && matches!(phase, Phase::Loading(_))
}

pub fn item_class(route: &Route, entry: &NavigationEntry, id: &str) -> Option<&'static str> {
    if !route.is_contact_page() {
        return None;
    }

    let rendered = entry.contact.as_ref().map(|contact| contact.id.as_str());
    let targeted = route.id.as_deref() == Some(id);

    if targeted && rendered == Some(id) {
        Some("active")
    } else if targeted {
        Some("pending")
    } else {
        None
    }
}
