pub mod glutin;
pub mod headless;

use crate::errors::*;
use crate::math::prelude::Vector2;

use super::events::Event;

/// The window, and the GL context living in it.
pub trait Visitor {
    /// Returns the size in pixels of the framebuffer.
    fn dimensions(&self) -> Vector2<u32>;
    /// Appends the events received since the last call.
    fn poll_events(&mut self, events: &mut Vec<Event>);
    fn is_current(&self) -> bool;
    fn swap_buffers(&self) -> Result<()>;
}

pub use self::glutin::new;

pub fn new_headless(dimensions: Vector2<u32>, frames: Vec<Vec<Event>>) -> Box<dyn Visitor> {
    Box::new(self::headless::HeadlessVisitor::new(dimensions, frames))
}
