//! Headless frame loop
//!
//! Drives an [`Orrery`] with synthetic timestamps at a fixed frame rate and
//! feeds scheduled control events in on the frames they name.

use orrery_sim::{ControlEvent, FrameReport, Orrery, RecordingRenderer};
use std::str::FromStr;
use tracing::{debug, info};

/// A control event queued for a specific frame
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledEvent {
    pub frame: u64,
    pub event: ControlEvent,
}

impl FromStr for ScheduledEvent {
    type Err = String;

    /// Parse `FRAME:EVENT`, e.g. `120:pause` or `30:drag=40,-10`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (frame, event) = s
            .split_once(':')
            .ok_or_else(|| format!("expected FRAME:EVENT, got '{}'", s))?;
        let frame = frame
            .trim()
            .parse()
            .map_err(|_| format!("invalid frame number '{}'", frame))?;
        let event = event.parse().map_err(|e| format!("{}", e))?;
        Ok(Self { frame, event })
    }
}

/// What to run
#[derive(Clone, Debug)]
pub struct RunPlan {
    pub frames: u64,
    pub fps: f64,
    pub events: Vec<ScheduledEvent>,
}

/// Result of a headless run
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    pub frames: u64,
    pub loops: u64,
    pub bodies_drawn: usize,
    pub last: FrameReport,
}

/// Tick `orrery` `plan.frames` times
pub fn run(orrery: &mut Orrery, plan: &RunPlan) -> RunSummary {
    let frame_ms = if plan.fps > 0.0 { 1000.0 / plan.fps } else { 0.0 };
    let mut renderer = RecordingRenderer::new();
    let mut summary = RunSummary::default();

    for frame in 0..plan.frames {
        for scheduled in plan.events.iter().filter(|e| e.frame == frame) {
            debug!(frame, event = ?scheduled.event, "scheduled event");
            orrery.push_event(scheduled.event.clone());
        }

        let report = orrery.tick(frame as f64 * frame_ms, &mut renderer);
        renderer.clear();

        if report.looped {
            summary.loops += 1;
            info!(frame, "playback looped");
        }
        summary.bodies_drawn += report.bodies_drawn;
        summary.frames += 1;
        summary.last = report;
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_core::{Vec2, Vec3};
    use orrery_sim::{BodyConfig, MemorySource, SimConfig};

    fn orrery(samples: usize) -> Orrery {
        let config = SimConfig {
            bodies: vec![BodyConfig::new("sun"), BodyConfig::new("earth")],
            ..SimConfig::default()
        };
        let positions = (0..samples).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
        Orrery::new(&config, &MemorySource::new().with("earth", positions)).unwrap()
    }

    #[test]
    fn test_parse_scheduled_event() {
        let event: ScheduledEvent = "120:pause".parse().unwrap();
        assert_eq!(event.frame, 120);
        assert_eq!(event.event, ControlEvent::TogglePause);

        let event: ScheduledEvent = "3:drag=40,-10".parse().unwrap();
        assert_eq!(event.event, ControlEvent::DragCamera(Vec2::new(40.0, -10.0)));

        assert!("pause".parse::<ScheduledEvent>().is_err());
        assert!("x:pause".parse::<ScheduledEvent>().is_err());
        assert!("1:warp".parse::<ScheduledEvent>().is_err());
    }

    #[test]
    fn test_run_advances_one_sample_per_second() {
        let mut orrery = orrery(100);
        let plan = RunPlan {
            frames: 130,
            fps: 60.0,
            events: Vec::new(),
        };

        let summary = run(&mut orrery, &plan);
        assert_eq!(summary.frames, 130);
        assert_eq!(summary.last.sample_index, 2);
        assert_eq!(summary.bodies_drawn, 260);
        assert_eq!(summary.loops, 0);
    }

    #[test]
    fn test_run_applies_scheduled_events() {
        let mut orrery = orrery(100);
        let plan = RunPlan {
            frames: 10,
            fps: 10.0,
            events: vec![
                "0:speed=10".parse().unwrap(),
                "5:pause".parse().unwrap(),
            ],
        };

        let summary = run(&mut orrery, &plan);
        assert!(summary.last.paused);
        assert_eq!(summary.last.sample_index, 4);
    }

    #[test]
    fn test_run_counts_loops() {
        let mut orrery = orrery(3);
        let plan = RunPlan {
            frames: 11,
            fps: 1.0,
            events: Vec::new(),
        };

        let summary = run(&mut orrery, &plan);
        assert_eq!(summary.loops, 5);
    }
}
