use std::fmt::Debug;

/// Projection target of a region. Only `Content` is visible, `NewContent`
/// renders detached until promoted.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Slot {
    Content,
    NewContent,
}

impl Slot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Content => "content",
            Slot::NewContent => "new-content",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SlotChange<K> {
    pub key: K,
    pub from: Option<Slot>,
    pub to: Option<Slot>,
}

/// Keeps the first `Content` candidate and demotes every other one to
/// `NewContent`.
pub fn normalize<K: Debug>(desired: &mut [(K, Option<Slot>)]) {
    let mut found = false;
    for (key, slot) in desired.iter_mut() {
        if *slot != Some(Slot::Content) {
            continue;
        }

        if found {
            tracing::warn!("demoting second content candidate: {:?}", key);
            *slot = Some(Slot::NewContent);
        } else {
            found = true;
        }
    }
}

/// Ordered changes from `current` to `desired`. Changes not taking `Content`
/// come first, so applying them one by one never leaves two holders.
pub fn resolve<K: Clone + Eq>(
    current: &[(K, Option<Slot>)],
    desired: &[(K, Option<Slot>)],
) -> Vec<SlotChange<K>> {
    let mut releases = Vec::new();
    let mut promotions = Vec::new();
    for (key, to) in desired {
        let from = current
            .iter()
            .find(|(current, _)| current == key)
            .and_then(|(_, slot)| *slot);

        if from == *to {
            continue;
        }

        let change = SlotChange {
            key: key.clone(),
            from,
            to: *to,
        };

        if *to == Some(Slot::Content) {
            promotions.push(change);
        } else {
            releases.push(change);
        }
    }

    releases.extend(promotions);
    releases
}

pub fn apply<K: Clone + Eq>(current: &mut Vec<(K, Option<Slot>)>, change: &SlotChange<K>) {
    match current.iter_mut().find(|(key, _)| key == &change.key) {
        Some((_, slot)) => *slot = change.to,
        None => current.push((change.key.clone(), change.to)),
    }
}

pub fn content_holders<K>(slots: &[(K, Option<Slot>)]) -> usize {
    slots
        .iter()
        .filter(|(_, slot)| *slot == Some(Slot::Content))
        .count()
}
