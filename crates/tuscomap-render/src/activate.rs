//! Per-group activation state, driven by discrete UI events.
//!
//! The host owns the event loop: it forwards pointer/focus/click events and
//! pumps [`ActivationState::tick`] so click-forced activations expire after
//! the configured hold. All transitions are synchronous and idempotent.

use crate::linker::{GroupId, LinkedScene};
use rustc_hash::{FxHashMap, FxHashSet};
use std::time::{Duration, Instant};

/// Where an interaction event landed: a label's interactive wrapper or a
/// connector line. Indices are scene indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionTarget {
    Label(usize),
    Connector(usize),
}

#[derive(Debug, Default)]
pub struct ActivationState {
    active: FxHashSet<GroupId>,
    click_until: FxHashMap<GroupId, Instant>,
}

impl ActivationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, id: GroupId) -> bool {
        self.active.contains(&id)
    }

    pub fn active_groups(&self) -> impl Iterator<Item = GroupId> + '_ {
        self.active.iter().copied()
    }

    fn group_for(scene: &LinkedScene, target: InteractionTarget) -> Option<GroupId> {
        match target {
            InteractionTarget::Label(idx) => scene.label_group(idx),
            InteractionTarget::Connector(idx) => scene.connector_group(idx),
        }
    }

    /// Pointer entered a label wrapper or connector. Re-entering an already
    /// active group only re-affirms the state.
    pub fn pointer_enter(&mut self, scene: &LinkedScene, target: InteractionTarget) {
        if let Some(id) = Self::group_for(scene, target) {
            self.active.insert(id);
        }
    }

    pub fn pointer_leave(&mut self, scene: &LinkedScene, target: InteractionTarget) {
        if let Some(id) = Self::group_for(scene, target) {
            self.active.remove(&id);
            self.click_until.remove(&id);
        }
    }

    /// Keyboard focus on the label's interactive wrapper.
    pub fn focus(&mut self, scene: &LinkedScene, label: usize) {
        self.pointer_enter(scene, InteractionTarget::Label(label));
    }

    pub fn blur(&mut self, scene: &LinkedScene, label: usize) {
        self.pointer_leave(scene, InteractionTarget::Label(label));
    }

    /// A click forces a transient activation that [`tick`](Self::tick)
    /// auto-reverts once `hold` has elapsed, so touch interaction (which
    /// never delivers a pointer-leave) still deactivates.
    pub fn click(&mut self, scene: &LinkedScene, label: usize, now: Instant, hold: Duration) {
        if let Some(id) = scene.label_group(label) {
            self.active.insert(id);
            self.click_until.insert(id, now + hold);
        }
    }

    /// Expires click-forced activations whose hold has elapsed.
    pub fn tick(&mut self, now: Instant) {
        let expired: Vec<GroupId> = self
            .click_until
            .iter()
            .filter(|(_, until)| now >= **until)
            .map(|(id, _)| *id)
            .collect();
        for id in expired {
            self.click_until.remove(&id);
            self.active.remove(&id);
        }
    }
}
