use std::cell::{RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crate::errors::*;
use crate::math::prelude::{Color, Vector2};

use super::backends::{self, Visitor};
use super::{ProgramId, UniformLocation, UniformVariable};

/// The information of video module since the last `advance`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct VideoFrameInfo {
    pub drawcall: u32,
    pub triangles: u32,
    /// How many times the bound program actually changed.
    pub program_switches: u32,
    pub alive_shaders: u32,
    pub alive_programs: u32,
    pub alive_buffers: u32,
    pub alive_vertex_arrays: u32,
    pub alive_textures: u32,
}

/// A shared handle to the graphics backend.
///
/// `Device` is cheap to clone; every resource wrapper keeps one so it can
/// release its GPU objects on drop. It is deliberately `!Send`: the GL
/// context is current on exactly one thread.
#[derive(Clone)]
pub struct Device {
    visitor: Rc<RefCell<Box<dyn Visitor>>>,
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Device {{ {:?} }}", self.info())
    }
}

impl Device {
    pub fn new(visitor: Box<dyn Visitor>) -> Self {
        Device {
            visitor: Rc::new(RefCell::new(visitor)),
        }
    }

    /// Creates a device backed by OpenGL.
    ///
    /// # Safety
    ///
    /// The GL function pointers must have been loaded and a context must be
    /// current on this thread (see `window::Window::new`).
    pub unsafe fn gl() -> Result<Self> {
        Ok(Device::new(backends::new()?))
    }

    /// Creates a device backed by the headless driver model.
    pub fn headless() -> Self {
        Device::new(backends::new_headless())
    }

    /// Returns the counters collected since the last `advance`, together with
    /// the number of objects currently alive.
    pub fn info(&self) -> VideoFrameInfo {
        self.visitor.borrow().info()
    }

    /// Returns the value last uploaded into `location` of `program`.
    pub fn uniform(&self, program: ProgramId, location: UniformLocation) -> Option<UniformVariable> {
        self.visitor.borrow().uniform(program, location)
    }

    /// Clears the color buffer of the default framebuffer.
    pub fn clear(&self, color: Color<f32>) -> Result<()> {
        unsafe { self.visitor().clear(color) }
    }

    pub fn set_viewport(&self, dimensions: Vector2<u32>) -> Result<()> {
        unsafe { self.visitor().set_viewport(dimensions) }
    }

    /// Advance one frame, resets the per-frame counters.
    pub fn advance(&self) {
        self.visitor().advance();
    }

    #[inline]
    pub(crate) fn visitor(&self) -> RefMut<Box<dyn Visitor>> {
        self.visitor.borrow_mut()
    }
}
