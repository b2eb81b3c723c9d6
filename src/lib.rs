//! # glsteps
//!
//! A handful of small exercises walking through the fixed raster pipeline of
//! OpenGL: a triangle, indexed quads, a textured quad under a perspective
//! projection and a few textured sprites under an orthographic projection.
//!
//! The library holds the pieces the exercises share:
//!
//! - `video::shader::ShaderProgram` compiles, links and owns a program, and
//! caches the locations of the uniforms it was asked for.
//! - `video::geometry::Geometry` owns a vertex buffer, an index buffer and the
//! vertex array that ties them to the shader inputs.
//! - `video::texture::Texture` owns a 2D texture decoded from an image file.
//! - `scene::Scene` draws a list of textured sprites in order.
//! - `application::run` opens the window, drives the render loop and tears
//! everything down in the right order.
//!
//! Every GPU call goes through a `video::Device`, which is backed either by
//! real OpenGL or by a headless backend that models the driver closely enough
//! to test the wrappers without a context.

#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde;

pub extern crate cgmath;

#[cfg(test)]
#[macro_use]
extern crate approx;

pub mod errors;
pub mod utils;
pub mod math;
pub mod video;
pub mod window;
pub mod scene;
pub mod application;

pub mod prelude {
    pub use crate::application::{Application, Context, Settings};
    pub use crate::errors::{Error, Result};
    pub use crate::math::prelude::*;
    pub use crate::scene::{Scene, Sprite, SpriteIndex};
    pub use crate::video::prelude::*;
    pub use crate::window::prelude::*;
}
