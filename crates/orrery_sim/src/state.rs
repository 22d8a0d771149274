//! Mutable simulation state
//!
//! Clock, camera and body selection live together so one control event can
//! be applied against a single struct.

use crate::camera::OrbitCamera;
use crate::config::SimConfig;
use crate::input::ControlEvent;
use crate::scene::SolarScene;
use orrery_animation::PlaybackClock;
use tracing::{debug, warn};

/// Everything user controls can change
#[derive(Clone, Debug)]
pub struct SimulationState {
    pub clock: PlaybackClock,
    pub camera: OrbitCamera,
    tracked: Option<String>,
}

impl SimulationState {
    /// Initial state for `config`, with the clock bounded by `max_time`
    pub fn new(config: &SimConfig, max_time: usize) -> Self {
        let playback = &config.playback;
        let mut clock = PlaybackClock::new(max_time)
            .with_time_scale(playback.time_scale)
            .with_negative_speed(playback.negative_speed)
            .with_speed(playback.speed);
        if playback.start_paused {
            clock = clock.paused();
        }

        Self {
            clock,
            camera: OrbitCamera::from_config(&config.camera),
            tracked: config.camera.track.clone(),
        }
    }

    /// Body the camera follows
    pub fn tracked(&self) -> Option<&str> {
        self.tracked.as_deref()
    }

    /// Apply one control event
    ///
    /// Selecting a body the scene does not know clears tracking.
    pub fn apply(&mut self, event: ControlEvent, scene: &SolarScene) {
        debug!(?event, "control event");
        match event {
            ControlEvent::Scrub(time) => self.clock.set_time(time),
            ControlEvent::TogglePause => {
                self.clock.toggle();
            }
            ControlEvent::SetSpeed(speed) => self.clock.set_speed(speed),
            ControlEvent::DragCamera(delta) => self.camera.drag(delta),
            ControlEvent::SelectTrackedBody(Some(name)) if !scene.contains(&name) => {
                warn!(body = %name, "unknown body selected, tracking cleared");
                self.tracked = None;
            }
            ControlEvent::SelectTrackedBody(selection) => self.tracked = selection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BodyConfig;
    use crate::source::MemorySource;
    use orrery_animation::{NegativeSpeed, PlaybackState};
    use orrery_core::Vec2;

    fn scene() -> SolarScene {
        let config = SimConfig {
            bodies: vec![BodyConfig::new("earth")],
            ..SimConfig::default()
        };
        SolarScene::build(&config, &MemorySource::new()).unwrap()
    }

    #[test]
    fn test_new_follows_config() {
        let mut config = SimConfig::default();
        config.playback.start_paused = true;
        config.playback.speed = -3.0;
        config.playback.negative_speed = NegativeSpeed::Rewind;
        config.camera.track = Some("earth".into());

        let state = SimulationState::new(&config, 100);
        assert!(state.clock.is_paused());
        assert_eq!(state.clock.speed(), -3.0);
        assert_eq!(state.clock.max_time(), 100);
        assert_eq!(state.tracked(), Some("earth"));
    }

    #[test]
    fn test_apply_controls() {
        let scene = scene();
        let mut state = SimulationState::new(&SimConfig::default(), 100);

        state.apply(ControlEvent::Scrub(42.0), &scene);
        assert_eq!(state.clock.sample_index(), 42);

        state.apply(ControlEvent::TogglePause, &scene);
        assert_eq!(state.clock.state(), PlaybackState::Paused);

        state.apply(ControlEvent::SetSpeed(2.0), &scene);
        assert_eq!(state.clock.speed(), 2.0);

        state.apply(ControlEvent::DragCamera(Vec2::new(100.0, 0.0)), &scene);
        assert!((state.camera.angle_y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_tracking_selection() {
        let scene = scene();
        let mut state = SimulationState::new(&SimConfig::default(), 0);

        state.apply(ControlEvent::SelectTrackedBody(Some("earth".into())), &scene);
        assert_eq!(state.tracked(), Some("earth"));

        state.apply(ControlEvent::SelectTrackedBody(Some("vulcan".into())), &scene);
        assert_eq!(state.tracked(), None);

        state.apply(ControlEvent::SelectTrackedBody(Some("earth".into())), &scene);
        state.apply(ControlEvent::SelectTrackedBody(None), &scene);
        assert_eq!(state.tracked(), None);
    }
}
