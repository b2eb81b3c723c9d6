//! Represents an OpenGL context and the window or environment around it.

pub mod events;

pub mod prelude {
    pub use super::events::{Event, InputEvent, Key, WindowEvent};
    pub use super::{Window, WindowParams};
}

mod backends;

use crate::errors::*;
use crate::math::prelude::Vector2;

use self::backends::Visitor;
use self::events::Event;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowParams {
    /// Sets the title of window.
    pub title: String,
    /// Sets the size in *points* of the client area of the window.
    pub size: Vector2<u32>,
    /// The OpenGL version requested, always with the core profile.
    pub gl_version: (u8, u8),
    /// Sets the multisampling level to request. A value of 0 indicates that
    /// multisampling must not be enabled.
    pub multisample: u16,
    /// Specifies whether should we have vsync.
    pub vsync: bool,
}

impl Default for WindowParams {
    fn default() -> Self {
        WindowParams {
            title: "Window".to_owned(),
            size: Vector2::new(800, 600),
            gl_version: (3, 3),
            multisample: 0,
            vsync: true,
        }
    }
}

/// A window with a current GL context.
pub struct Window {
    visitor: Box<dyn Visitor>,
    events: Vec<Event>,
}

impl Window {
    /// Opens a native window and makes its context current on this thread.
    pub fn new(params: &WindowParams) -> Result<Self> {
        Ok(Window {
            visitor: backends::new(params)?,
            events: Vec::new(),
        })
    }

    /// Creates a window without any display behind it. Each call to
    /// `poll_events` yields the next batch of `frames`; once they are
    /// exhausted the window asks to be closed.
    pub fn headless(dimensions: Vector2<u32>, frames: Vec<Vec<Event>>) -> Self {
        Window {
            visitor: backends::new_headless(dimensions, frames),
            events: Vec::new(),
        }
    }

    /// Returns the size in pixels of the framebuffer.
    #[inline]
    pub fn dimensions(&self) -> Vector2<u32> {
        self.visitor.dimensions()
    }

    /// Returns the events received since the last call.
    pub fn poll_events(&mut self) -> &[Event] {
        self.events.clear();
        self.visitor.poll_events(&mut self.events);
        &self.events
    }

    /// Returns true if this context is the current one in this thread.
    #[inline]
    pub fn is_current(&self) -> bool {
        self.visitor.is_current()
    }

    #[inline]
    pub fn swap_buffers(&self) -> Result<()> {
        self.visitor.swap_buffers()
    }
}

#[cfg(test)]
mod test {
    use super::events::*;
    use super::*;

    #[test]
    fn headless() {
        let frames = vec![
            vec![Event::pressed(Key::Tab)],
            vec![Event::Window(WindowEvent::Resized(320, 240))],
        ];

        let mut window = Window::headless(Vector2::new(640, 480), frames);
        assert!(window.is_current());
        assert_eq!(window.poll_events(), &[Event::pressed(Key::Tab)]);
        assert_eq!(window.dimensions(), Vector2::new(640, 480));

        window.poll_events();
        assert_eq!(window.dimensions(), Vector2::new(320, 240));

        assert_eq!(
            window.poll_events(),
            &[Event::Window(WindowEvent::Closed)]
        );
    }

    #[test]
    fn params() {
        let params: WindowParams = serde_json::from_str(r#"{ "title": "quads" }"#).unwrap();
        assert_eq!(params.title, "quads");
        assert_eq!(params.gl_version, (3, 3));
        assert_eq!(params.size, Vector2::new(800, 600));
    }
}
