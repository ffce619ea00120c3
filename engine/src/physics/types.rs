//! Physics type re-exports from glam
//!
//! Every position and velocity in the crate is a single-precision
//! `glam::Vec3`.

pub use glam::Vec3;
