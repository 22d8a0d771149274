//! Orrery Core
//!
//! Math primitives shared by every Orrery crate:
//!
//! - **Vectors**: [`Vec2`] for screen-space deltas, [`Vec3`] for positions
//! - **Matrices**: column-major [`Mat4`] with the affine constructors the
//!   scene graph and camera need
//! - **Colors**: linear RGBA [`Color`] for orbit lines and materials
//!
//! # Example
//!
//! ```rust
//! use orrery_core::{Mat4, Vec3};
//!
//! let carrier = Mat4::translation(10.0, 0.0, 0.0);
//! let body = Mat4::scale(0.25, 0.25, 0.25);
//! let world = carrier.mul(&body);
//!
//! assert_eq!(world.transform_point(Vec3::ZERO), Vec3::new(10.0, 0.0, 0.0));
//! ```

pub mod color;
pub mod math;

pub use color::Color;
pub use math::{Mat4, Vec2, Vec3};
