//! User control events
//!
//! Events are queued as they arrive and drained at the start of the next
//! frame, so a whole frame always sees one consistent state.

use orrery_core::Vec2;
use std::str::FromStr;
use thiserror::Error;

/// A discrete user control
#[derive(Clone, Debug, PartialEq)]
pub enum ControlEvent {
    /// Jump to an absolute simulation time
    Scrub(f64),
    /// Flip between running and paused
    TogglePause,
    /// Replace the speed factor
    SetSpeed(f64),
    /// Pointer drag in pixels
    DragCamera(Vec2),
    /// Follow a body with the camera, or stop following
    SelectTrackedBody(Option<String>),
}

/// Malformed event text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid event '{0}' (expected scrub=T, pause, speed=F, drag=DX,DY, track=NAME or untrack)")]
pub struct ParseEventError(pub String);

impl FromStr for ControlEvent {
    type Err = ParseEventError;

    /// Parse `scrub=120`, `pause`, `speed=2.5`, `drag=10,-4`, `track=earth`
    /// or `untrack`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseEventError(s.to_string());
        let (key, value) = match s.trim().split_once('=') {
            Some((k, v)) => (k.trim(), Some(v.trim())),
            None => (s.trim(), None),
        };

        match (key, value) {
            ("pause", None) => Ok(ControlEvent::TogglePause),
            ("untrack", None) => Ok(ControlEvent::SelectTrackedBody(None)),
            ("scrub", Some(v)) => v.parse().map(ControlEvent::Scrub).map_err(|_| err()),
            ("speed", Some(v)) => v.parse().map(ControlEvent::SetSpeed).map_err(|_| err()),
            ("track", Some(v)) if !v.is_empty() => {
                Ok(ControlEvent::SelectTrackedBody(Some(v.to_string())))
            }
            ("drag", Some(v)) => {
                let (dx, dy) = v.split_once(',').ok_or_else(err)?;
                let dx = dx.trim().parse().map_err(|_| err())?;
                let dy = dy.trim().parse().map_err(|_| err())?;
                Ok(ControlEvent::DragCamera(Vec2::new(dx, dy)))
            }
            _ => Err(err()),
        }
    }
}

/// Pending events, drained once per frame
#[derive(Clone, Debug, Default)]
pub struct InputQueue {
    pending: Vec<ControlEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: ControlEvent) {
        self.pending.push(event);
    }

    /// Take every pending event in arrival order
    pub fn drain(&mut self) -> Vec<ControlEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_events() {
        assert_eq!("scrub=120.5".parse(), Ok(ControlEvent::Scrub(120.5)));
        assert_eq!("pause".parse(), Ok(ControlEvent::TogglePause));
        assert_eq!("speed = 2".parse(), Ok(ControlEvent::SetSpeed(2.0)));
        assert_eq!("drag=10,-4".parse(), Ok(ControlEvent::DragCamera(Vec2::new(10.0, -4.0))));
        assert_eq!(
            "track=earth".parse(),
            Ok(ControlEvent::SelectTrackedBody(Some("earth".into())))
        );
        assert_eq!("untrack".parse(), Ok(ControlEvent::SelectTrackedBody(None)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "scrub", "scrub=abc", "drag=1", "track=", "warp=9", "pause=1"] {
            assert!(bad.parse::<ControlEvent>().is_err(), "{bad}");
        }
    }

    #[test]
    fn test_queue_drains_in_order() {
        let mut queue = InputQueue::new();
        queue.push(ControlEvent::TogglePause);
        queue.push(ControlEvent::Scrub(3.0));
        assert_eq!(queue.len(), 2);

        assert_eq!(
            queue.drain(),
            vec![ControlEvent::TogglePause, ControlEvent::Scrub(3.0)]
        );
        assert!(queue.is_empty());
    }
}
