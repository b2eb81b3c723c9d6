//! Textured sprites drawn in insertion order.

pub mod sprite;
pub use self::sprite::Sprite;

use std::slice::Iter;

use crate::errors::*;
use crate::video::prelude::ShaderProgram;

/// The position of a sprite inside its `Scene`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpriteIndex(usize);

impl SpriteIndex {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// An ordered list of sprites. Later sprites are drawn on top of earlier ones.
#[derive(Default)]
pub struct Scene {
    sprites: Vec<Sprite>,
}

impl Scene {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add(&mut self, sprite: Sprite) -> SpriteIndex {
        self.sprites.push(sprite);
        SpriteIndex(self.sprites.len() - 1)
    }

    #[inline]
    pub fn get(&self, index: SpriteIndex) -> Option<&Sprite> {
        self.sprites.get(index.0)
    }

    #[inline]
    pub fn get_mut(&mut self, index: SpriteIndex) -> Option<&mut Sprite> {
        self.sprites.get_mut(index.0)
    }

    /// Returns the index that follows `index`, wrapping around at the end.
    pub fn next(&self, index: SpriteIndex) -> Option<SpriteIndex> {
        if self.sprites.is_empty() {
            None
        } else {
            Some(SpriteIndex((index.0 + 1) % self.sprites.len()))
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> Iter<Sprite> {
        self.sprites.iter()
    }

    /// Draws every sprite with `program`, which must be current.
    pub fn draw(&self, program: &ShaderProgram) -> Result<()> {
        for v in &self.sprites {
            v.draw(program)?;
        }

        Ok(())
    }
}
