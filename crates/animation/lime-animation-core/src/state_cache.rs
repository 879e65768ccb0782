//! Snapshot and restore of `{running, time}` for every animation in a subtree.
//!
//! Each node keeps its own snapshot, so a subtree restore touches only nodes
//! that were captured with the same animation layout.

use serde::{Deserialize, Serialize};

use crate::node::NodeRef;
use crate::time::seconds_to_frames;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationState {
    pub animation_id: String,
    pub is_running: bool,
    pub time: f64,
}

/// Per-node snapshot, ordered like the node's animation list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationStates {
    states: Vec<AnimationState>,
}

impl AnimationStates {
    pub fn states(&self) -> &[AnimationState] {
        &self.states
    }

    pub fn get(&self, animation_id: &str) -> Option<&AnimationState> {
        self.states.iter().find(|s| s.animation_id == animation_id)
    }
}

/// Captures every animation in the subtree. With `initial`, the root node's
/// own animations are stored as stopped.
pub fn create(node: &NodeRef, initial: bool) {
    let children = {
        let mut n = node.borrow_mut();
        let states = n
            .animations
            .iter()
            .map(|a| AnimationState {
                animation_id: a.id().to_string(),
                is_running: !initial && a.is_running(),
                time: a.time(),
            })
            .collect();
        n.states = Some(AnimationStates { states });
        n.children.clone()
    };
    for child in &children {
        create(child, false);
    }
}

/// Applies stored snapshots across the subtree.
///
/// Returns `false` when a node has no snapshot or its animation layout no
/// longer matches; that node's children are then left untouched. Times are
/// only written when they differ so cached marker state stays valid.
pub fn restore(node: &NodeRef) -> bool {
    let children = {
        let mut guard = node.borrow_mut();
        let n = &mut *guard;
        let Some(snapshot) = n.states.as_ref() else {
            return false;
        };
        let matches = snapshot.states.len() == n.animations.len()
            && snapshot
                .states
                .iter()
                .zip(&n.animations)
                .all(|(s, a)| s.animation_id == a.id());
        if !matches {
            log::debug!("snapshot of node '{}' no longer matches its animations", n.id());
            return false;
        }
        for (state, animation) in snapshot.states.iter().zip(n.animations.iter_mut()) {
            animation.set_running(state.is_running);
            if animation.time() != state.time {
                animation.set_time(state.time);
            }
        }
        n.children.clone()
    };
    let mut restored = true;
    for child in &children {
        restored &= restore(child);
    }
    restored
}

/// Drops snapshots across the subtree.
pub fn remove(node: &NodeRef) {
    for n in node.subtree() {
        n.borrow_mut().states = None;
    }
}

pub fn exists(node: &NodeRef) -> bool {
    node.borrow().states.is_some()
}

/// Frame of `animation_id` recorded in `node`'s snapshot.
pub fn cached_frame(node: &NodeRef, animation_id: &str) -> Option<i32> {
    let n = node.borrow();
    let state = n.states.as_ref()?.get(animation_id)?;
    Some(seconds_to_frames(state.time))
}
