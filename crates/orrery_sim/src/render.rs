//! Renderer seam
//!
//! The simulation submits one frame at a time: `begin_frame`, orbit lines,
//! bodies, `end_frame`. Every world transform is current before the first
//! draw call. Backends report failures through [`RenderError`]; the frame
//! driver logs them and keeps going.

use crate::camera::CameraView;
use orrery_core::{Color, Mat4, Vec3};
use orrery_scene::{MeshHandle, Renderable};
use thiserror::Error;

/// Backend failure
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("render backend error: {0}")]
    Backend(String),
}

/// A body's full trajectory drawn as a line strip
#[derive(Clone, Copy, Debug)]
pub struct OrbitLine<'a> {
    pub body: &'a str,
    pub color: Color,
    pub points: &'a [Vec3],
    /// Space the points live in (the orbit carrier's parent)
    pub transform: Mat4,
}

/// A body mesh at its world transform
#[derive(Clone, Copy, Debug)]
pub struct DrawBody<'a> {
    pub body: &'a str,
    pub renderable: &'a Renderable,
    pub world: Mat4,
}

/// Consumes frames produced by the simulation
pub trait Renderer {
    fn begin_frame(&mut self, view: &CameraView) -> Result<(), RenderError>;

    fn draw_orbit(&mut self, line: &OrbitLine<'_>) -> Result<(), RenderError>;

    fn draw_body(&mut self, body: &DrawBody<'_>) -> Result<(), RenderError>;

    fn end_frame(&mut self) -> Result<(), RenderError>;
}

/// A recorded renderer call
#[derive(Clone, Debug, PartialEq)]
pub enum RenderCommand {
    BeginFrame {
        eye: Vec3,
        target: Vec3,
        view_projection: Mat4,
    },
    Orbit {
        body: String,
        color: Color,
        points: usize,
    },
    Body {
        body: String,
        mesh: MeshHandle,
        texture: Option<String>,
        world: Mat4,
    },
    EndFrame,
}

/// Renderer that records every call
///
/// Used headless by the CLI and by tests.
#[derive(Clone, Debug, Default)]
pub struct RecordingRenderer {
    commands: Vec<RenderCommand>,
    frames: u64,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded since the last [`clear`](Self::clear)
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Completed frames
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Body draws among the recorded commands
    pub fn bodies_drawn(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::Body { .. }))
            .count()
    }

    /// Forget recorded commands, keeping the frame count
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Renderer for RecordingRenderer {
    fn begin_frame(&mut self, view: &CameraView) -> Result<(), RenderError> {
        self.commands.push(RenderCommand::BeginFrame {
            eye: view.eye,
            target: view.target,
            view_projection: view.view_projection,
        });
        Ok(())
    }

    fn draw_orbit(&mut self, line: &OrbitLine<'_>) -> Result<(), RenderError> {
        self.commands.push(RenderCommand::Orbit {
            body: line.body.to_string(),
            color: line.color,
            points: line.points.len(),
        });
        Ok(())
    }

    fn draw_body(&mut self, body: &DrawBody<'_>) -> Result<(), RenderError> {
        self.commands.push(RenderCommand::Body {
            body: body.body.to_string(),
            mesh: body.renderable.mesh,
            texture: body.renderable.material.texture.clone(),
            world: body.world,
        });
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        self.commands.push(RenderCommand::EndFrame);
        self.frames += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_scene::Material;

    #[test]
    fn test_recording_renderer_records_in_order() {
        let mut renderer = RecordingRenderer::new();
        let renderable = Renderable::new(MeshHandle::SPHERE, Material::textured("earth.jpg"));
        let points = [Vec3::ZERO, Vec3::ONE];

        renderer.begin_frame(&CameraView::default()).unwrap();
        renderer
            .draw_orbit(&OrbitLine {
                body: "earth",
                color: Color::WHITE,
                points: &points,
                transform: Mat4::IDENTITY,
            })
            .unwrap();
        renderer
            .draw_body(&DrawBody {
                body: "earth",
                renderable: &renderable,
                world: Mat4::translation(1.0, 2.0, 3.0),
            })
            .unwrap();
        renderer.end_frame().unwrap();

        let commands = renderer.commands();
        assert_eq!(commands.len(), 4);
        assert!(matches!(commands[0], RenderCommand::BeginFrame { .. }));
        assert!(matches!(&commands[1], RenderCommand::Orbit { points: 2, .. }));
        assert!(matches!(
            &commands[2],
            RenderCommand::Body { texture: Some(t), .. } if t == "earth.jpg"
        ));
        assert_eq!(commands[3], RenderCommand::EndFrame);
        assert_eq!(renderer.frames(), 1);
        assert_eq!(renderer.bodies_drawn(), 1);

        renderer.clear();
        assert!(renderer.commands().is_empty());
        assert_eq!(renderer.frames(), 1);
    }
}
