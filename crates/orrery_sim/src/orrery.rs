//! Frame driver
//!
//! [`Orrery`] owns the scene and the simulation state and runs the two-phase
//! tick: drain queued controls, then advance the clock, update bodies,
//! propagate transforms, place the camera and submit the frame.

use crate::camera::CameraView;
use crate::config::SimConfig;
use crate::input::{ControlEvent, InputQueue};
use crate::render::{DrawBody, OrbitLine, RenderError, Renderer};
use crate::scene::SolarScene;
use crate::source::PositionSource;
use crate::state::SimulationState;
use crate::Result;
use indexmap::IndexMap;
use orrery_animation::FrameTimer;
use orrery_core::Vec3;
use serde::Serialize;
use tracing::{debug, trace, warn};

/// Summary of one tick
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FrameReport {
    pub frame: u64,
    pub sample_index: usize,
    pub time: f64,
    pub paused: bool,
    pub looped: bool,
    pub eye: Vec3,
    pub target: Vec3,
    /// Bodies that had a sample this frame
    pub bodies_updated: usize,
    /// Bodies the renderer accepted
    pub bodies_drawn: usize,
}

/// Serializable view of the scene after a tick
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SceneSnapshot {
    pub frame: u64,
    pub time: f64,
    pub sample_index: usize,
    pub speed: f64,
    pub paused: bool,
    pub tracked: Option<String>,
    pub camera: CameraView,
    pub bodies: IndexMap<String, BodySnapshot>,
}

/// Per-body part of a [`SceneSnapshot`]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BodySnapshot {
    /// World position of the body
    pub position: Vec3,
    /// Sample currently shown, `None` without data
    pub sample: Option<usize>,
    pub samples: usize,
}

/// A running solar system simulation
#[derive(Debug)]
pub struct Orrery {
    scene: SolarScene,
    state: SimulationState,
    input: InputQueue,
    timer: FrameTimer,
    view: CameraView,
    aspect: f32,
    frames: u64,
}

impl Orrery {
    /// Build the scene for `config` and prime world transforms
    pub fn new<S: PositionSource + ?Sized>(config: &SimConfig, source: &S) -> Result<Self> {
        config.validate()?;
        let scene = SolarScene::build(config, source)?;
        let state = SimulationState::new(config, scene.max_time());

        let mut orrery = Self {
            scene,
            state,
            input: InputQueue::new(),
            timer: FrameTimer::new(),
            view: CameraView::default(),
            aspect: 1.0,
            frames: 0,
        };
        orrery.scene.propagate();
        orrery.view = orrery.camera_view();

        debug!(
            bodies = orrery.scene.len(),
            max_time = orrery.state.clock.max_time(),
            "orrery ready"
        );
        Ok(orrery)
    }

    /// Queue a control for the next tick
    pub fn push_event(&mut self, event: ControlEvent) {
        self.input.push(event);
    }

    /// Update the projection aspect ratio; degenerate sizes are ignored
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            trace!(width, height, "ignoring empty viewport");
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    /// Run one frame from a wall-clock timestamp and submit it to `renderer`
    ///
    /// Renderer failures are logged; the tick always completes.
    pub fn tick(&mut self, timestamp_ms: f64, renderer: &mut dyn Renderer) -> FrameReport {
        let elapsed_ms = self.timer.tick(timestamp_ms);
        let mut report = self.step(elapsed_ms, std::iter::empty());
        report.bodies_drawn = self.render(renderer);
        report
    }

    /// Advance the simulation by `elapsed_ms` without rendering
    ///
    /// Queued events and `events` are applied first, in that order; the
    /// clock then advances, bodies move and spin, transforms propagate and
    /// the camera is placed.
    pub fn step(
        &mut self,
        elapsed_ms: f64,
        events: impl IntoIterator<Item = ControlEvent>,
    ) -> FrameReport {
        for event in self.input.drain().into_iter().chain(events) {
            self.state.apply(event, &self.scene);
        }

        let looped = self.state.clock.advance(elapsed_ms);
        let bodies_updated = self.scene.update_bodies(&self.state.clock);
        self.scene.propagate();
        self.view = self.camera_view();
        self.frames += 1;

        let clock = &self.state.clock;
        trace!(
            frame = self.frames,
            time = clock.time(),
            index = clock.sample_index(),
            "stepped"
        );
        FrameReport {
            frame: self.frames,
            sample_index: clock.sample_index(),
            time: clock.time(),
            paused: clock.is_paused(),
            looped,
            eye: self.view.eye,
            target: self.view.target,
            bodies_updated,
            bodies_drawn: 0,
        }
    }

    /// Submit the current frame, returning how many bodies were drawn
    pub fn render(&self, renderer: &mut dyn Renderer) -> usize {
        log_render_error("begin_frame", renderer.begin_frame(&self.view));

        for body in self.scene.bodies() {
            let Some(color) = body.orbit_color() else {
                continue;
            };
            if body.positions().is_empty() {
                continue;
            }
            let line = OrbitLine {
                body: body.name(),
                color,
                points: body.positions(),
                transform: self.scene.orbit_space(body),
            };
            log_render_error("draw_orbit", renderer.draw_orbit(&line));
        }

        let graph = self.scene.graph();
        let mut drawn = 0;
        for body in self.scene.bodies() {
            let Some(node) = graph.get(body.spin_node()) else {
                continue;
            };
            let Some(renderable) = &node.renderable else {
                continue;
            };
            let item = DrawBody {
                body: body.name(),
                renderable,
                world: *node.world(),
            };
            if log_render_error("draw_body", renderer.draw_body(&item)) {
                drawn += 1;
            }
        }

        log_render_error("end_frame", renderer.end_frame());
        drawn
    }

    /// Serializable state of the current frame
    pub fn snapshot(&self) -> SceneSnapshot {
        let clock = &self.state.clock;
        let graph = self.scene.graph();
        let bodies = self
            .scene
            .bodies()
            .map(|body| {
                let snapshot = BodySnapshot {
                    position: graph.world_position(body.spin_node()).unwrap_or(Vec3::ZERO),
                    sample: clock.resolve_index(body.positions().len()),
                    samples: body.positions().len(),
                };
                (body.name().to_string(), snapshot)
            })
            .collect();

        SceneSnapshot {
            frame: self.frames,
            time: clock.time(),
            sample_index: clock.sample_index(),
            speed: clock.speed(),
            paused: clock.is_paused(),
            tracked: self.state.tracked().map(str::to_string),
            camera: self.view,
            bodies,
        }
    }

    pub fn scene(&self) -> &SolarScene {
        &self.scene
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Camera matrices of the last frame
    pub fn view(&self) -> &CameraView {
        &self.view
    }

    /// Frames stepped so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Follow the tracked body when it has data, otherwise look at the origin
    fn camera_view(&self) -> CameraView {
        let target = self
            .state
            .tracked()
            .and_then(|name| self.scene.tracked_position(name))
            .unwrap_or(Vec3::ZERO);
        self.state.camera.view(target, self.aspect)
    }
}

fn log_render_error(call: &str, result: std::result::Result<(), RenderError>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            warn!(call, %err, "renderer error");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BodyConfig;
    use crate::render::{RecordingRenderer, RenderCommand};
    use crate::source::MemorySource;
    use orrery_core::Mat4;

    fn line(n: usize) -> Vec<Vec3> {
        (0..n).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect()
    }

    fn orrery() -> Orrery {
        let config = SimConfig {
            bodies: vec![
                BodyConfig::new("sun").with_scale(2.0).with_spin(0.005),
                BodyConfig::new("earth")
                    .with_scale(0.25)
                    .with_orbit_color([0.6, 0.3, 0.1, 1.0].into()),
            ],
            ..SimConfig::default()
        };
        let source = MemorySource::new().with("earth", line(100));
        Orrery::new(&config, &source).unwrap()
    }

    fn earth_position(orrery: &Orrery) -> Vec3 {
        orrery.snapshot().bodies["earth"].position
    }

    fn spin_local(orrery: &Orrery, name: &str) -> Mat4 {
        let body = orrery.scene().body(name).unwrap();
        orrery.scene().graph().local(body.spin_node()).unwrap()
    }

    #[test]
    fn test_step_moves_bodies() {
        let mut orrery = orrery();
        let report = orrery.step(2500.0, []);

        assert_eq!(report.frame, 1);
        assert_eq!(report.sample_index, 2);
        assert_eq!(report.bodies_updated, 1);
        assert_eq!(earth_position(&orrery), Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_pause_freezes_position_not_spin() {
        let mut orrery = orrery();
        orrery.step(3000.0, []);
        let before = earth_position(&orrery);
        let spin_before = spin_local(&orrery, "earth");

        orrery.step(0.0, [ControlEvent::TogglePause]);
        for _ in 0..5 {
            let report = orrery.step(1000.0, []);
            assert!(report.paused);
        }

        assert_eq!(earth_position(&orrery), before);
        assert!(!spin_local(&orrery, "earth").approx_eq(&spin_before, 1e-6));
    }

    #[test]
    fn test_scrub_while_paused() {
        let mut orrery = orrery();
        orrery.step(0.0, [ControlEvent::TogglePause, ControlEvent::Scrub(40.0)]);
        assert_eq!(earth_position(&orrery), Vec3::new(40.0, 0.0, 0.0));
        assert!(orrery.state().clock.is_paused());
    }

    #[test]
    fn test_empty_sequence_is_safe() {
        let mut orrery = orrery();
        for _ in 0..10 {
            orrery.step(700.0, []);
        }

        let sun = orrery.scene().body("sun").unwrap();
        assert_eq!(orrery.scene().graph().local(sun.orbit_node()), Some(Mat4::IDENTITY));
        assert_eq!(orrery.snapshot().bodies["sun"].sample, None);
        assert!(!spin_local(&orrery, "sun").approx_eq(&Mat4::uniform_scale(2.0), 1e-6));
    }

    #[test]
    fn test_tracked_camera_follows_body() {
        let mut orrery = orrery();
        orrery.step(5000.0, [ControlEvent::SelectTrackedBody(Some("earth".into()))]);

        let view = orrery.view();
        let offset = orrery.state().camera.offset();
        assert_eq!(view.target, Vec3::new(5.0, 0.0, 0.0));
        assert!(view.eye.approx_eq(Vec3::new(5.0, 0.0, 0.0) + offset, 1e-4));
    }

    #[test]
    fn test_tracking_body_without_data_looks_at_origin() {
        let mut orrery = orrery();
        let report = orrery.step(5000.0, [ControlEvent::SelectTrackedBody(Some("sun".into()))]);
        assert_eq!(report.target, Vec3::ZERO);
        assert!(report.eye.approx_eq(orrery.state().camera.offset(), 1e-4));
    }

    #[test]
    fn test_queued_events_apply_before_advance() {
        let mut orrery = orrery();
        orrery.push_event(ControlEvent::SetSpeed(10.0));
        orrery.push_event(ControlEvent::Scrub(20.0));

        let report = orrery.step(500.0, []);
        assert_eq!(report.sample_index, 25);
        assert_eq!(earth_position(&orrery), Vec3::new(25.0, 0.0, 0.0));
    }

    #[test]
    fn test_events_pushed_after_step_wait_for_next_tick() {
        let mut orrery = orrery();
        orrery.step(1000.0, []);
        orrery.push_event(ControlEvent::TogglePause);
        assert!(!orrery.state().clock.is_paused());

        let report = orrery.step(1000.0, []);
        assert!(report.paused);
        assert_eq!(report.sample_index, 1);
    }

    #[test]
    fn test_clock_loops_at_max_time() {
        let mut orrery = orrery();
        orrery.step(0.0, [ControlEvent::Scrub(98.5)]);
        let report = orrery.step(1000.0, []);
        assert!(report.looped);
        assert_eq!(report.sample_index, 0);
        assert_eq!(earth_position(&orrery), Vec3::ZERO);
    }

    #[test]
    fn test_tick_submits_frame() {
        let mut orrery = orrery();
        let mut renderer = RecordingRenderer::new();

        let first = orrery.tick(1000.0, &mut renderer);
        assert_eq!(first.sample_index, 0);
        assert_eq!(first.bodies_drawn, 2);

        let second = orrery.tick(4000.0, &mut renderer);
        assert_eq!(second.sample_index, 3);

        let commands = renderer.commands();
        assert!(matches!(commands[0], RenderCommand::BeginFrame { .. }));
        assert!(matches!(&commands[1], RenderCommand::Orbit { body, points: 100, .. } if body == "earth"));
        assert!(matches!(&commands[2], RenderCommand::Body { body, .. } if body == "sun"));
        assert!(matches!(&commands[3], RenderCommand::Body { body, .. } if body == "earth"));
        assert_eq!(commands[4], RenderCommand::EndFrame);
        assert_eq!(renderer.frames(), 2);
    }

    #[test]
    fn test_drawn_world_transforms_are_current() {
        let mut orrery = orrery();
        let mut renderer = RecordingRenderer::new();
        orrery.tick(0.0, &mut renderer);
        renderer.clear();
        orrery.tick(7000.0, &mut renderer);

        let earth = renderer.commands().iter().find_map(|c| match c {
            RenderCommand::Body { body, world, .. } if body == "earth" => Some(*world),
            _ => None,
        });
        assert_eq!(earth.map(|w| w.translation_part()), Some(Vec3::new(7.0, 0.0, 0.0)));
    }

    #[test]
    fn test_renderer_errors_do_not_abort_tick() {
        struct Flaky {
            bodies: usize,
        }
        impl Renderer for Flaky {
            fn begin_frame(&mut self, _view: &CameraView) -> std::result::Result<(), RenderError> {
                Err(RenderError::Backend("surface lost".into()))
            }
            fn draw_orbit(&mut self, _line: &OrbitLine<'_>) -> std::result::Result<(), RenderError> {
                Err(RenderError::Backend("no line pipeline".into()))
            }
            fn draw_body(&mut self, body: &DrawBody<'_>) -> std::result::Result<(), RenderError> {
                if body.body == "sun" {
                    return Err(RenderError::Backend("texture missing".into()));
                }
                self.bodies += 1;
                Ok(())
            }
            fn end_frame(&mut self) -> std::result::Result<(), RenderError> {
                Ok(())
            }
        }

        let mut orrery = orrery();
        let mut renderer = Flaky { bodies: 0 };
        let report = orrery.tick(0.0, &mut renderer);
        let report2 = orrery.tick(2000.0, &mut renderer);

        assert_eq!(report.bodies_drawn, 1);
        assert_eq!(report2.sample_index, 2);
        assert_eq!(renderer.bodies, 2);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut orrery = orrery();
        orrery.step(3000.0, [ControlEvent::SelectTrackedBody(Some("earth".into()))]);

        let json = serde_json::to_value(orrery.snapshot()).unwrap();
        assert_eq!(json["sample_index"], 3);
        assert_eq!(json["tracked"], "earth");
        assert_eq!(json["bodies"]["earth"]["samples"], 100);
        assert_eq!(json["bodies"]["earth"]["position"]["x"], 3.0);
        assert!(json["bodies"]["sun"]["sample"].is_null());
        assert!(json["camera"]["eye"].is_object());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = SimConfig::default();
        config.camera.radius = -1.0;
        assert!(Orrery::new(&config, &MemorySource::new()).is_err());
    }
}
