use std::collections::VecDeque;

use crate::errors::*;
use crate::math::prelude::Vector2;

use super::super::events::{Event, WindowEvent};
use super::Visitor;

/// A window that replays scripted events, one batch per frame, and asks to
/// be closed once the script runs out.
pub struct HeadlessVisitor {
    dimensions: Vector2<u32>,
    frames: VecDeque<Vec<Event>>,
}

impl HeadlessVisitor {
    pub fn new(dimensions: Vector2<u32>, frames: Vec<Vec<Event>>) -> Self {
        HeadlessVisitor {
            dimensions,
            frames: frames.into(),
        }
    }
}

impl Visitor for HeadlessVisitor {
    #[inline]
    fn dimensions(&self) -> Vector2<u32> {
        self.dimensions
    }

    fn poll_events(&mut self, events: &mut Vec<Event>) {
        match self.frames.pop_front() {
            Some(frame) => {
                for v in frame {
                    if let Event::Window(WindowEvent::Resized(w, h)) = v {
                        self.dimensions = Vector2::new(w, h);
                    }

                    events.push(v);
                }
            }
            None => events.push(Event::Window(WindowEvent::Closed)),
        }
    }

    #[inline]
    fn is_current(&self) -> bool {
        true
    }

    #[inline]
    fn swap_buffers(&self) -> Result<()> {
        Ok(())
    }
}
