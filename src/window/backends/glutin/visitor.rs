use gl;
use glutin;
use glutin::GlContext;

use crate::errors::*;
use crate::math::prelude::Vector2;

use super::super::super::events::{Event, WindowEvent};
use super::super::super::WindowParams;
use super::super::Visitor;
use super::types;

pub struct GlutinVisitor {
    window: glutin::GlWindow,
    events_loop: glutin::EventsLoop,
    dimensions: Vector2<u32>,
}

impl GlutinVisitor {
    pub fn from(params: &WindowParams) -> Result<Self> {
        let builder = glutin::WindowBuilder::new()
            .with_title(params.title.clone())
            .with_dimensions(glutin::dpi::LogicalSize::new(
                f64::from(params.size.x),
                f64::from(params.size.y),
            ));

        let (major, minor) = params.gl_version;
        let context = glutin::ContextBuilder::new()
            .with_multisampling(params.multisample)
            .with_gl_profile(glutin::GlProfile::Core)
            .with_gl(glutin::GlRequest::Specific(glutin::Api::OpenGl, (major, minor)))
            .with_vsync(params.vsync);

        let events_loop = glutin::EventsLoop::new();
        let window = glutin::GlWindow::new(builder, context, &events_loop)?;

        unsafe {
            window.make_current()?;
            gl::load_with(|symbol| window.get_proc_address(symbol) as *const _);
        }

        let dimensions = window
            .get_inner_size()
            .map(|v| {
                let v = v.to_physical(window.get_hidpi_factor());
                Vector2::new(v.width as u32, v.height as u32)
            })
            .unwrap_or(params.size);

        info!(
            "Creates window {:?} ({}x{}) with OpenGL {}.{} core profile.",
            params.title, dimensions.x, dimensions.y, major, minor
        );

        Ok(GlutinVisitor {
            window,
            events_loop,
            dimensions,
        })
    }
}

impl Visitor for GlutinVisitor {
    #[inline]
    fn dimensions(&self) -> Vector2<u32> {
        self.dimensions
    }

    fn poll_events(&mut self, events: &mut Vec<Event>) {
        let mut received = Vec::new();
        self.events_loop.poll_events(|v| received.push(v));

        let dpr = self.window.get_hidpi_factor();
        for v in received {
            if let Some(e) = types::from_event(v, dpr) {
                if let Event::Window(WindowEvent::Resized(w, h)) = e {
                    self.dimensions = Vector2::new(w, h);
                    let size = glutin::dpi::PhysicalSize::new(f64::from(w), f64::from(h));
                    self.window.resize(size);
                }

                events.push(e);
            }
        }
    }

    #[inline]
    fn is_current(&self) -> bool {
        self.window.is_current()
    }

    #[inline]
    fn swap_buffers(&self) -> Result<()> {
        self.window.swap_buffers()?;
        Ok(())
    }
}
