//! Serializable scene descriptions and their conversion into node trees.

use serde::{Deserialize, Serialize};

use crate::animation::{Animation, Marker, MarkerAction, Trigger};
use crate::behaviors::{AudioSource, ParticleEmitter};
use crate::error::ConfigError;
use crate::node::{Node, NodeRef};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDesc {
    pub root: NodeDesc,
    #[serde(default)]
    pub ranges: Vec<AnimationRangeDesc>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDesc {
    pub id: String,
    #[serde(default)]
    pub behavior: BehaviorDesc,
    #[serde(default)]
    pub animations: Vec<AnimationDesc>,
    #[serde(default)]
    pub children: Vec<NodeDesc>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BehaviorDesc {
    #[default]
    None,
    ParticleEmitter {
        rate: f64,
    },
    AudioSource,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationDesc {
    /// Empty id names the node's default animation.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub markers: Vec<Marker>,
    #[serde(default)]
    pub triggers: Vec<Trigger>,
}

/// Frame span of an animation plus the nodes it applies to.
/// `nodes` and `ignore_nodes` are mutually exclusive.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationRangeDesc {
    pub animation: String,
    pub start_frame: i32,
    pub end_frame: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_nodes: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeFilter {
    All,
    Only(Vec<String>),
    Except(Vec<String>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimationRange {
    pub animation: String,
    pub start_frame: i32,
    pub end_frame: i32,
    pub filter: NodeFilter,
}

impl AnimationRange {
    pub fn includes(&self, node_id: &str) -> bool {
        match &self.filter {
            NodeFilter::All => true,
            NodeFilter::Only(ids) => ids.iter().any(|id| id == node_id),
            NodeFilter::Except(ids) => !ids.iter().any(|id| id == node_id),
        }
    }

    pub fn contains_frame(&self, frame: i32) -> bool {
        (self.start_frame..=self.end_frame).contains(&frame)
    }
}

impl AnimationRangeDesc {
    pub fn resolve(&self) -> Result<AnimationRange, ConfigError> {
        let filter = match (&self.nodes, &self.ignore_nodes) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::ConflictingFrameDirectives {
                    animation: self.animation.clone(),
                })
            }
            (Some(ids), None) => NodeFilter::Only(ids.clone()),
            (None, Some(ids)) => NodeFilter::Except(ids.clone()),
            (None, None) => NodeFilter::All,
        };
        if self.end_frame < self.start_frame {
            return Err(ConfigError::InvalidRange {
                animation: self.animation.clone(),
                start_frame: self.start_frame,
                end_frame: self.end_frame,
            });
        }
        Ok(AnimationRange {
            animation: self.animation.clone(),
            start_frame: self.start_frame,
            end_frame: self.end_frame,
            filter,
        })
    }
}

impl AnimationDesc {
    fn build(&self) -> Result<Animation, ConfigError> {
        for marker in &self.markers {
            if let MarkerAction::Jump(target) = &marker.action {
                if !self.markers.iter().any(|m| &m.id == target) {
                    return Err(ConfigError::UnknownJumpTarget {
                        animation: self.id.clone(),
                        marker: marker.id.clone(),
                        target: target.clone(),
                    });
                }
            }
        }
        Ok(Animation::new(self.id.clone())
            .with_markers(self.markers.clone())
            .with_triggers(self.triggers.clone())
            .running(self.running))
    }
}

impl NodeDesc {
    pub fn build(&self) -> Result<NodeRef, ConfigError> {
        let mut node = Node::new(self.id.clone());
        for anim in &self.animations {
            node.add_animation(anim.build()?);
        }
        match &self.behavior {
            BehaviorDesc::None => {}
            BehaviorDesc::ParticleEmitter { rate } => {
                node.set_behavior(Box::new(ParticleEmitter::new(*rate)))
            }
            BehaviorDesc::AudioSource => node.set_behavior(Box::new(AudioSource::new())),
        }
        let node = NodeRef::new(node);
        for child in &self.children {
            node.add_child(child.build()?);
        }
        Ok(node)
    }
}

/// A loaded scene: the node tree plus resolved animation ranges.
#[derive(Clone, Debug)]
pub struct Scene {
    pub root: NodeRef,
    pub ranges: Vec<AnimationRange>,
}

impl Scene {
    pub fn from_desc(desc: &SceneDesc) -> Result<Self, ConfigError> {
        let ranges = desc
            .ranges
            .iter()
            .map(AnimationRangeDesc::resolve)
            .collect::<Result<Vec<_>, _>>()?;
        let root = desc.root.build()?;
        Ok(Self { root, ranges })
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let desc: SceneDesc = serde_json::from_str(text)?;
        Self::from_desc(&desc)
    }

    pub fn range(&self, animation: &str) -> Option<&AnimationRange> {
        self.ranges.iter().find(|r| r.animation == animation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_filters() {
        let only = AnimationRangeDesc {
            animation: "walk".into(),
            start_frame: 0,
            end_frame: 10,
            nodes: Some(vec!["a".into()]),
            ignore_nodes: None,
        }
        .resolve()
        .unwrap();
        assert!(only.includes("a"));
        assert!(!only.includes("b"));
        assert!(only.contains_frame(10));
        assert!(!only.contains_frame(11));

        let except = AnimationRangeDesc {
            animation: "walk".into(),
            start_frame: 0,
            end_frame: 10,
            nodes: None,
            ignore_nodes: Some(vec!["a".into()]),
        }
        .resolve()
        .unwrap();
        assert!(!except.includes("a"));
        assert!(except.includes("b"));
    }

    #[test]
    fn inverted_range_rejected() {
        let err = AnimationRangeDesc {
            animation: "walk".into(),
            start_frame: 5,
            end_frame: 1,
            ..Default::default()
        }
        .resolve()
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRange { .. }));
    }

    #[test]
    fn unknown_jump_target_rejected() {
        let json = r#"{
            "root": { "id": "root", "animations": [ {
                "markers": [ { "id": "m", "frame": 3, "action": { "Jump": "nope" } } ]
            } ] }
        }"#;
        let err = Scene::from_json(json).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownJumpTarget { .. }));
    }
}
