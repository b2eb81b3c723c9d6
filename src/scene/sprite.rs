use std::rc::Rc;

use crate::errors::*;
use crate::math::prelude::*;
use crate::video::prelude::{Geometry, ShaderProgram, Texture, UniformLocation};

/// A Sprite is a texture mapped planar mesh placed by its own model matrix.
/// Sprites usually share one quad geometry.
pub struct Sprite {
    geometry: Rc<Geometry>,
    texture: Rc<Texture>,
    transform: Matrix4<f32>,
    location: UniformLocation,
}

impl Sprite {
    /// Creates a sprite at the origin. `location` is where the model matrix
    /// goes in the program that draws it.
    pub fn new(geometry: Rc<Geometry>, texture: Rc<Texture>, location: UniformLocation) -> Self {
        Sprite {
            geometry,
            texture,
            transform: Matrix4::identity(),
            location,
        }
    }

    pub fn with_transform(mut self, transform: Matrix4<f32>) -> Self {
        self.transform = transform;
        self
    }

    #[inline]
    pub fn transform(&self) -> Matrix4<f32> {
        self.transform
    }

    #[inline]
    pub fn set_transform(&mut self, transform: Matrix4<f32>) {
        self.transform = transform;
    }

    /// Rotates about the local Z axis, on top of the current transform.
    pub fn rotate<A: Into<Rad<f32>>>(&mut self, angle: A) {
        self.transform = self.transform * Matrix4::from_angle_z(angle.into());
    }

    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[inline]
    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    /// Binds the texture to unit 0, uploads the model matrix and draws.
    pub fn draw(&self, program: &ShaderProgram) -> Result<()> {
        self.texture.bind(0)?;
        program.set_uniform_matrix4fv(self.location, &self.transform)?;
        self.geometry.draw()
    }
}
