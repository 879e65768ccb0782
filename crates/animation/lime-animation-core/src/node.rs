//! Scene nodes: animations, children, and an optional behaviour for side effects.

use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use lime_task::RunningProbe;

use crate::animation::{AdvanceFlags, Animation};
use crate::state_cache::AnimationStates;

/// Context for one subtree advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdvanceContext {
    pub fast_forward: bool,
    pub audio_enabled: bool,
    /// Queue fired trigger names on their nodes for [`Node::take_fired_triggers`].
    /// Only set when someone drains the queue.
    pub record_triggers: bool,
}

impl Default for AdvanceContext {
    fn default() -> Self {
        Self {
            fast_forward: false,
            audio_enabled: true,
            record_triggers: false,
        }
    }
}

/// Side-effecting node content (particles, audio, ...).
pub trait NodeBehavior {
    fn advance(&mut self, _delta: f64, _ctx: &AdvanceContext) {}

    /// Called for every trigger fired by one of the node's animations.
    fn trigger(&mut self, _name: &str, _ctx: &AdvanceContext) {}

    fn clear_particles(&mut self) {}

    fn as_any(&self) -> &dyn Any;
}

pub struct Node {
    id: String,
    pub(crate) animations: Vec<Animation>,
    pub(crate) children: Vec<NodeRef>,
    behavior: Option<Box<dyn NodeBehavior>>,
    ignore_markers: bool,
    fired_triggers: Vec<String>,
    pub(crate) states: Option<AnimationStates>,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            animations: Vec::new(),
            children: Vec::new(),
            behavior: None,
            ignore_markers: false,
            fired_triggers: Vec::new(),
            states: None,
        }
    }

    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animations.push(animation);
        self
    }

    pub fn with_behavior(mut self, behavior: impl NodeBehavior + 'static) -> Self {
        self.behavior = Some(Box::new(behavior));
        self
    }

    pub fn set_behavior(&mut self, behavior: Box<dyn NodeBehavior>) {
        self.behavior = Some(behavior);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn animations(&self) -> &[Animation] {
        &self.animations
    }

    pub fn animation(&self, id: &str) -> Option<&Animation> {
        self.animations.iter().find(|a| a.id() == id)
    }

    pub fn animation_mut(&mut self, id: &str) -> Option<&mut Animation> {
        self.animations.iter_mut().find(|a| a.id() == id)
    }

    pub fn add_animation(&mut self, animation: Animation) {
        self.animations.push(animation);
    }

    pub fn ignore_markers(&self) -> bool {
        self.ignore_markers
    }

    pub fn set_ignore_markers(&mut self, ignore: bool) {
        self.ignore_markers = ignore;
    }

    pub fn behavior_as<T: 'static>(&self) -> Option<&T> {
        self.behavior.as_ref()?.as_any().downcast_ref::<T>()
    }

    /// Trigger names fired under a recording [`AdvanceContext`] since the last call.
    pub fn take_fired_triggers(&mut self) -> Vec<String> {
        std::mem::take(&mut self.fired_triggers)
    }

    pub fn snapshot(&self) -> Option<&AnimationStates> {
        self.states.as_ref()
    }

    fn advance_self(&mut self, delta: f64, ctx: &AdvanceContext) {
        let flags = AdvanceFlags {
            ignore_markers: self.ignore_markers,
            fast_forward: ctx.fast_forward,
        };
        let mut fired = Vec::new();
        for animation in &mut self.animations {
            animation.advance(delta, flags, &mut fired);
        }
        if let Some(behavior) = self.behavior.as_mut() {
            behavior.advance(delta, ctx);
            for name in &fired {
                behavior.trigger(name, ctx);
            }
        }
        if ctx.record_triggers {
            self.fired_triggers.extend(fired);
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("animations", &self.animations)
            .field("children", &self.children.len())
            .field("has_behavior", &self.behavior.is_some())
            .field("ignore_markers", &self.ignore_markers)
            .finish()
    }
}

/// Shared handle to a node; trees are built from these.
#[derive(Clone, Debug)]
pub struct NodeRef(Rc<RefCell<Node>>);

impl NodeRef {
    pub fn new(node: Node) -> Self {
        Self(Rc::new(RefCell::new(node)))
    }

    pub fn borrow(&self) -> Ref<'_, Node> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Node> {
        self.0.borrow_mut()
    }

    pub fn ptr_eq(&self, other: &NodeRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn id(&self) -> String {
        self.0.borrow().id.clone()
    }

    pub fn add_child(&self, child: NodeRef) {
        self.0.borrow_mut().children.push(child);
    }

    pub fn children(&self) -> Vec<NodeRef> {
        self.0.borrow().children.clone()
    }

    /// Depth-first search of the subtree, including this node.
    pub fn find(&self, id: &str) -> Option<NodeRef> {
        if self.0.borrow().id == id {
            return Some(self.clone());
        }
        self.children().iter().find_map(|c| c.find(id))
    }

    /// Every node in the subtree in pre-order, including this one.
    pub fn subtree(&self) -> Vec<NodeRef> {
        let mut out = Vec::new();
        self.collect_subtree(&mut out);
        out
    }

    fn collect_subtree(&self, out: &mut Vec<NodeRef>) {
        out.push(self.clone());
        for child in self.children() {
            child.collect_subtree(out);
        }
    }

    pub fn has_animation(&self, id: &str) -> bool {
        self.0.borrow().animation(id).is_some()
    }

    pub fn animation_time(&self, id: &str) -> Option<f64> {
        self.0.borrow().animation(id).map(Animation::time)
    }

    pub fn set_running(&self, id: &str, running: bool) {
        if let Some(animation) = self.0.borrow_mut().animation_mut(id) {
            animation.set_running(running);
        }
    }

    pub fn set_time(&self, id: &str, time: f64) {
        if let Some(animation) = self.0.borrow_mut().animation_mut(id) {
            animation.set_time(time);
        }
    }

    pub fn set_frame(&self, id: &str, frame: i32) {
        if let Some(animation) = self.0.borrow_mut().animation_mut(id) {
            animation.set_frame(frame);
        }
    }

    pub fn set_ignore_markers(&self, ignore: bool) {
        self.0.borrow_mut().ignore_markers = ignore;
    }

    /// Advances this node and then its children, parent first.
    pub fn advance_animations_recursive(&self, delta: f64, ctx: &AdvanceContext) {
        let children = {
            let mut node = self.0.borrow_mut();
            node.advance_self(delta, ctx);
            node.children.clone()
        };
        for child in &children {
            child.advance_animations_recursive(delta, ctx);
        }
    }

    /// Plain playback update.
    pub fn update(&self, delta: f64) {
        self.advance_animations_recursive(delta, &AdvanceContext::default());
    }

    pub fn set_time_recursive(&self, time: f64) {
        for node in self.subtree() {
            for animation in &mut node.0.borrow_mut().animations {
                animation.set_time(time);
            }
        }
    }

    pub fn stop_animations_recursive(&self) {
        for node in self.subtree() {
            for animation in &mut node.0.borrow_mut().animations {
                animation.set_running(false);
            }
        }
    }

    pub fn clear_particles_recursive(&self) {
        for node in self.subtree() {
            if let Some(behavior) = node.0.borrow_mut().behavior.as_mut() {
                behavior.clear_particles();
            }
        }
    }

    /// True while any animation in the subtree is running.
    pub fn is_running(&self) -> bool {
        self.subtree()
            .iter()
            .any(|n| n.0.borrow().animations.iter().any(Animation::is_running))
    }
}

impl RunningProbe for NodeRef {
    fn is_running(&self) -> bool {
        NodeRef::is_running(self)
    }
}
