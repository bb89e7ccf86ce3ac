use rolodex_navigation::{NavigationEntry, Route, Signal};

use crate::{
    action::Action,
    api::ApiError,
    indicator,
    model::Model,
    outlet::{Identity, Outlet, OutletId, Outlets, Payload, Phase},
    slot::{self, Slot},
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SlotKey {
    Outlet(OutletId),
    Splash,
}

/// Delivers the signal to every outlet and refreshes slots and indicators.
/// Outlets are idempotent under repeated signals.
#[tracing::instrument(skip(model))]
pub fn broadcast(model: &mut Model, signal: &Signal) -> Vec<Action> {
    let route = model.store.route();
    let entry = model.store.read();
    let generation = model.store.generation();

    let mut actions = Vec::new();
    for outlet in model.outlets.iter_mut() {
        actions.extend(evaluate(outlet, &route, &entry, generation, signal));
    }

    refresh(model, &route, &entry);

    actions
}

fn evaluate(
    outlet: &mut Outlet,
    route: &Route,
    entry: &NavigationEntry,
    generation: u64,
    signal: &Signal,
) -> Vec<Action> {
    let requested = match outlet.requested(route) {
        Some(it) => it,
        None => {
            outlet.phase = Phase::Inactive;
            outlet.state.active = false;
            return Vec::new();
        }
    };

    outlet.state.active = true;

    if outlet.cached(entry).as_ref() == Some(&requested) {
        set_ready(outlet, requested);
        return Vec::new();
    }

    if signal.is_written_by(outlet.id.name()) && outlet.written.as_ref() == Some(&requested) {
        tracing::trace!("{} accepts own write for {:?}", outlet.id.name(), requested);
        set_ready(outlet, requested);
        return Vec::new();
    }

    if let (Phase::Failed(failed), Signal::Replaced { .. }) = (&outlet.phase, signal) {
        if failed == &requested {
            return Vec::new();
        }
    }

    outlet.phase = Phase::Loading(requested.clone());
    if outlet.in_flight.get(&requested) == Some(&generation) {
        tracing::trace!("{} already fetching {:?}", outlet.id.name(), requested);
        return Vec::new();
    }

    match outlet.request(&requested, generation) {
        Some(task) => {
            tracing::debug!("{} fetching {:?}", outlet.id.name(), requested);
            outlet.in_flight.insert(requested, generation);
            vec![Action::Task(task)]
        }
        None => Vec::new(),
    }
}

fn set_ready(outlet: &mut Outlet, identity: Identity) {
    outlet.phase = Phase::Ready(identity);
    outlet.ready_once = true;
}

/// A fetch resolved. Results for an identity the current route no longer
/// asks for are dropped, as are results fetched before the latest
/// invalidation.
#[tracing::instrument(skip(model, result))]
pub fn landed(
    model: &mut Model,
    id: OutletId,
    identity: Identity,
    generation: u64,
    result: Result<Payload, ApiError>,
) -> Vec<Action> {
    let route = model.store.route();
    let current = model.store.generation();
    let outlet = match model.outlets.get_mut(id) {
        Some(it) => it,
        None => return Vec::new(),
    };

    if outlet.in_flight.get(&identity) == Some(&generation) {
        outlet.in_flight.remove(&identity);
    }

    if generation != current {
        tracing::trace!(
            "discarding {:?} for {}, fetched in generation {} before {}",
            identity,
            id.name(),
            generation,
            current
        );
        return Vec::new();
    }

    if outlet.requested(&route).as_ref() != Some(&identity) {
        tracing::trace!(
            "discarding {:?} for {}, route asks for {:?}",
            identity,
            id.name(),
            outlet.requested(&route)
        );
        return Vec::new();
    }

    let payload = match result {
        Ok(it) => it,
        Err(error) => {
            tracing::error!("{} failed loading {:?}: {:?}", id.name(), identity, error);

            outlet.phase = Phase::Failed(identity);
            let entry = model.store.read();
            refresh(model, &route, &entry);

            return Vec::new();
        }
    };

    let patches = outlet.patches(&identity, payload);
    outlet.written = Some(identity);

    let version = match model.store.replace(patches) {
        Ok(it) => it,
        Err(error) => {
            tracing::error!("writing history state failed: {:?}", error);
            return Vec::new();
        }
    };

    broadcast(
        model,
        &Signal::Replaced {
            writer: id.name().to_string(),
            version,
        },
    )
}

/// Recomputes slots and indicators from the outlet phases.
fn refresh(model: &mut Model, route: &Route, entry: &NavigationEntry) {
    indicator::update(model, route, entry);
    assign_slots(model, entry);
}

fn assign_slots(model: &mut Model, entry: &NavigationEntry) {
    let sidebar_active = model.outlets.is_active(OutletId::Sidebar);

    let mut details = Outlets::DETAILS
        .iter()
        .filter_map(|id| model.outlets.get(*id))
        .map(|outlet| {
            let slot = if !sidebar_active || !outlet.state.active || outlet.id == OutletId::Home {
                None
            } else if outlet.has_data(entry) || outlet.is_failed() {
                Some(Slot::Content)
            } else {
                Some(Slot::NewContent)
            };
            (SlotKey::Outlet(outlet.id), slot)
        })
        .collect::<Vec<_>>();

    let taken = slot::content_holders(&details) > 0;
    for (key, slot) in details.iter_mut() {
        if *key == SlotKey::Outlet(OutletId::Home) && sidebar_active {
            *slot = Some(if taken {
                Slot::NewContent
            } else {
                Slot::Content
            });
        }
    }

    let mut top = Outlets::TOP_LEVEL
        .iter()
        .filter_map(|id| model.outlets.get(*id))
        .map(|outlet| {
            let slot = if !outlet.state.active {
                None
            } else if outlet.has_data(entry)
                || outlet.is_failed()
                || outlet.state.slot == Some(Slot::Content)
            {
                Some(Slot::Content)
            } else {
                Some(Slot::NewContent)
            };
            (SlotKey::Outlet(outlet.id), slot)
        })
        .collect::<Vec<_>>();

    let taken = slot::content_holders(&top) > 0;
    let splash = (!model.page_loaded && !taken).then_some(Slot::Content);
    top.push((SlotKey::Splash, splash));

    apply_level(model, details);
    apply_level(model, top);
}

fn apply_level(model: &mut Model, mut desired: Vec<(SlotKey, Option<Slot>)>) {
    slot::normalize(&mut desired);

    let mut current: Vec<_> = desired
        .iter()
        .map(|(key, _)| (*key, current_slot(model, key)))
        .collect();

    for change in slot::resolve(&current, &desired) {
        tracing::trace!("slot change: {:?}", change);

        slot::apply(&mut current, &change);
        match change.key {
            SlotKey::Outlet(id) => {
                if let Some(outlet) = model.outlets.get_mut(id) {
                    outlet.state.slot = change.to;
                }
            }
            SlotKey::Splash => model.splash = change.to,
        }
    }
}

fn current_slot(model: &Model, key: &SlotKey) -> Option<Slot> {
    match key {
        SlotKey::Outlet(id) => model.outlets.get(*id).and_then(|outlet| outlet.state.slot),
        SlotKey::Splash => model.splash,
    }
}
