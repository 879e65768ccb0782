//! A single named animation: a time cursor plus frame-anchored markers and triggers.

use serde::{Deserialize, Serialize};

use crate::time::{frames_to_seconds, seconds_to_frames};

/// What a marker does when playback crosses it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerAction {
    Play,
    Stop,
    /// Continue from the marker with the given id.
    Jump(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: String,
    pub frame: i32,
    pub action: MarkerAction,
}

/// Named event fired when playback passes its frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub frame: i32,
    pub name: String,
}

/// Per-advance switches derived from node flags and the driving context.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdvanceFlags {
    /// Pass through `Stop` and `Jump` markers.
    pub ignore_markers: bool,
    /// Fast-forwarding: `Jump` markers are never taken.
    pub fast_forward: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    id: String,
    time: f64,
    is_running: bool,
    markers: Vec<Marker>,
    triggers: Vec<Trigger>,
    next_event_time: Option<f64>,
    /// Cursor position where a `Stop` marker halted playback; its triggers already fired.
    stopped_at: Option<f64>,
}

impl Animation {
    pub fn new(id: impl Into<String>) -> Self {
        let mut animation = Self {
            id: id.into(),
            time: 0.0,
            is_running: false,
            markers: Vec::new(),
            triggers: Vec::new(),
            next_event_time: None,
            stopped_at: None,
        };
        animation.refresh_next_event();
        animation
    }

    pub fn with_markers(mut self, mut markers: Vec<Marker>) -> Self {
        markers.sort_by_key(|m| m.frame);
        self.markers = markers;
        self.refresh_next_event();
        self
    }

    pub fn with_triggers(mut self, mut triggers: Vec<Trigger>) -> Self {
        triggers.sort_by_key(|t| t.frame);
        self.triggers = triggers;
        self.refresh_next_event();
        self
    }

    pub fn running(mut self, running: bool) -> Self {
        self.is_running = running;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Moves the cursor without firing anything. The cached next-event time
    /// is recomputed on the next advance.
    pub fn set_time(&mut self, time: f64) {
        self.time = time;
        self.next_event_time = None;
        self.stopped_at = None;
    }

    pub fn frame(&self) -> i32 {
        seconds_to_frames(self.time)
    }

    pub fn set_frame(&mut self, frame: i32) {
        self.set_time(frames_to_seconds(frame));
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn set_running(&mut self, running: bool) {
        self.is_running = running;
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    /// Time of the first marker or trigger after the cursor, as of the last advance.
    pub fn next_event_time(&self) -> Option<f64> {
        self.next_event_time
    }

    pub fn marker(&self, id: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    /// Advances the cursor by `delta` seconds when running.
    ///
    /// Triggers with times in `[prev, next)` are appended to `fired`; when a
    /// `Stop` marker halts playback, a trigger sitting on the marker fires too,
    /// and not again when playback resumes from there.
    /// The first applicable `Stop`/`Jump` marker in `(prev, next]` ends the step.
    /// A zero delta only resynchronises the cached next-event time.
    pub fn advance(&mut self, delta: f64, flags: AdvanceFlags, fired: &mut Vec<String>) {
        if self.is_running && delta > 0.0 {
            let prev = self.time;
            let already_fired = self.stopped_at.take().filter(|at| *at == prev);
            let mut next = prev + delta;
            let mut stopped = false;
            let mut jump_to = None;

            let hit = self
                .markers
                .iter()
                .filter(|m| marker_applies(m, flags))
                .map(|m| (m, frames_to_seconds(m.frame)))
                .find(|(_, t)| *t > prev && *t <= next);
            if let Some((marker, at)) = hit {
                next = at;
                match &marker.action {
                    MarkerAction::Stop => stopped = true,
                    MarkerAction::Jump(target) => match self.marker(target) {
                        Some(dest) => jump_to = Some(frames_to_seconds(dest.frame)),
                        None => log::warn!(
                            "animation '{}': jump marker '{}' targets missing '{}'",
                            self.id,
                            marker.id,
                            target
                        ),
                    },
                    MarkerAction::Play => {}
                }
            }

            for trigger in &self.triggers {
                let at = frames_to_seconds(trigger.frame);
                if already_fired == Some(at) {
                    continue;
                }
                if at >= prev && (at < next || (stopped && at <= next)) {
                    fired.push(trigger.name.clone());
                }
            }

            if stopped {
                self.is_running = false;
                self.stopped_at = Some(next);
            }
            self.time = jump_to.unwrap_or(next);
        }
        self.refresh_next_event();
    }

    fn refresh_next_event(&mut self) {
        let now = self.time;
        let markers = self.markers.iter().map(|m| frames_to_seconds(m.frame));
        let triggers = self.triggers.iter().map(|t| frames_to_seconds(t.frame));
        self.next_event_time = markers
            .chain(triggers)
            .filter(|t| *t > now)
            .fold(None, |best: Option<f64>, t| Some(best.map_or(t, |b| b.min(t))));
    }
}

fn marker_applies(marker: &Marker, flags: AdvanceFlags) -> bool {
    match marker.action {
        MarkerAction::Play => false,
        MarkerAction::Stop => !flags.ignore_markers,
        MarkerAction::Jump(_) => !flags.ignore_markers && !flags.fast_forward,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(id: &str, frame: i32, action: MarkerAction) -> Marker {
        Marker {
            id: id.into(),
            frame,
            action,
        }
    }

    #[test]
    fn stopped_animation_does_not_move() {
        let mut anim = Animation::new("a");
        let mut fired = Vec::new();
        anim.advance(1.0, AdvanceFlags::default(), &mut fired);
        assert_eq!(anim.time(), 0.0);
    }

    #[test]
    fn stop_marker_halts_unless_ignored() {
        let base = Animation::new("a")
            .running(true)
            .with_markers(vec![marker("end", 3, MarkerAction::Stop)]);
        let mut fired = Vec::new();

        let mut anim = base.clone();
        anim.advance(1.0, AdvanceFlags::default(), &mut fired);
        assert_eq!(anim.time(), frames_to_seconds(3));
        assert!(!anim.is_running());

        let mut anim = base;
        let flags = AdvanceFlags {
            ignore_markers: true,
            fast_forward: false,
        };
        anim.advance(1.0, flags, &mut fired);
        assert_eq!(anim.time(), 1.0);
        assert!(anim.is_running());
    }

    #[test]
    fn jump_marker_skipped_while_fast_forwarding() {
        let base = Animation::new("a").running(true).with_markers(vec![
            marker("start", 0, MarkerAction::Play),
            marker("loop", 6, MarkerAction::Jump("start".into())),
        ]);
        let mut fired = Vec::new();

        let mut anim = base.clone();
        anim.advance(0.25, AdvanceFlags::default(), &mut fired);
        assert_eq!(anim.time(), 0.0);

        let mut anim = base;
        let flags = AdvanceFlags {
            ignore_markers: false,
            fast_forward: true,
        };
        anim.advance(0.25, flags, &mut fired);
        assert_eq!(anim.time(), 0.25);
    }

    #[test]
    fn triggers_fire_once_on_half_open_interval() {
        let mut anim = Animation::new("a").running(true).with_triggers(vec![Trigger {
            frame: 3,
            name: "hit".into(),
        }]);
        let mut fired = Vec::new();
        anim.advance(frames_to_seconds(3), AdvanceFlags::default(), &mut fired);
        assert!(fired.is_empty());
        anim.advance(0.01, AdvanceFlags::default(), &mut fired);
        assert_eq!(fired, vec!["hit".to_string()]);
        anim.advance(0.01, AdvanceFlags::default(), &mut fired);
        assert_eq!(fired.len(), 1);
    }

    #[test]
    fn trigger_on_stop_marker_fires_once_across_resume() {
        let mut anim = Animation::new("a")
            .running(true)
            .with_markers(vec![marker("halt", 3, MarkerAction::Stop)])
            .with_triggers(vec![Trigger {
                frame: 3,
                name: "boom".into(),
            }]);
        let mut fired = Vec::new();
        anim.advance(1.0, AdvanceFlags::default(), &mut fired);
        assert_eq!(fired, vec!["boom".to_string()]);
        assert!(!anim.is_running());

        anim.set_running(true);
        anim.advance(0.05, AdvanceFlags::default(), &mut fired);
        assert_eq!(fired, vec!["boom".to_string()]);
        assert!(anim.time() > frames_to_seconds(3));

        // Rewinding onto the marker re-arms the trigger.
        anim.set_frame(3);
        anim.advance(0.05, AdvanceFlags::default(), &mut fired);
        assert_eq!(fired.len(), 2);
    }

    #[test]
    fn next_event_time_tracks_cursor() {
        let mut anim = Animation::new("a").running(true).with_triggers(vec![
            Trigger {
                frame: 3,
                name: "a".into(),
            },
            Trigger {
                frame: 9,
                name: "b".into(),
            },
        ]);
        assert_eq!(anim.next_event_time(), Some(frames_to_seconds(3)));
        anim.set_frame(5);
        assert_eq!(anim.next_event_time(), None);
        anim.advance(0.0, AdvanceFlags::default(), &mut Vec::new());
        assert_eq!(anim.next_event_time(), Some(frames_to_seconds(9)));
    }
}
