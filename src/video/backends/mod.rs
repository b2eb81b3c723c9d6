//! The backend of renderer, which should be responsible for only one thing:
//! talking to the low-level OpenGL video APIs.

pub mod gl;
pub mod headless;

mod utils;

use crate::errors::*;
use crate::math::prelude::{Color, Vector2};

use super::geometry::VertexLayout;
use super::texture::{TextureData, TextureParams};
use super::{BufferId, BufferKind, ProgramId, ShaderId, TextureId, VertexArrayId};
use super::{UniformLocation, UniformVariable, VideoFrameInfo};

/// One-to-one mapping of the driver calls the wrappers need.
///
/// Every `unsafe` method requires the context of this visitor to be current
/// on the calling thread.
pub trait Visitor {
    /// Compiles one stage. The shader object is deleted again when the
    /// compilation fails.
    unsafe fn compile(&mut self, stage: ShaderStage, src: &str) -> Result<ShaderId>;

    unsafe fn delete_shader(&mut self, id: ShaderId) -> Result<()>;

    /// Attaches `shaders` to a new program and links it. The program object
    /// is deleted again when linking fails.
    unsafe fn link(&mut self, shaders: &[ShaderId]) -> Result<ProgramId>;

    unsafe fn delete_program(&mut self, id: ProgramId) -> Result<()>;

    unsafe fn uniform_location(&mut self, id: ProgramId, name: &str) -> Result<UniformLocation>;

    /// Makes `id` the current program. Does nothing if it already is.
    unsafe fn bind_program(&mut self, id: ProgramId) -> Result<()>;

    /// Uploads `variable` into the current program.
    unsafe fn bind_uniform(
        &mut self,
        location: UniformLocation,
        variable: &UniformVariable,
    ) -> Result<()>;

    unsafe fn create_buffer(&mut self, kind: BufferKind, bytes: &[u8]) -> Result<BufferId>;

    unsafe fn delete_buffer(&mut self, id: BufferId) -> Result<()>;

    /// Records `vbo`, the optional `ibo` and one attribute pointer per
    /// element of `layout` into a new vertex array.
    unsafe fn create_vertex_array(
        &mut self,
        vbo: BufferId,
        ibo: Option<BufferId>,
        layout: &VertexLayout,
    ) -> Result<VertexArrayId>;

    unsafe fn delete_vertex_array(&mut self, id: VertexArrayId) -> Result<()>;

    /// Draws `len` `u32` indices of triangles from the index buffer of `vao`.
    unsafe fn draw_elements(&mut self, vao: VertexArrayId, len: u32) -> Result<()>;

    /// Draws `len` vertices of triangles from the vertex buffer of `vao`.
    unsafe fn draw_arrays(&mut self, vao: VertexArrayId, len: u32) -> Result<()>;

    unsafe fn create_texture(
        &mut self,
        params: &TextureParams,
        data: &TextureData,
    ) -> Result<TextureId>;

    unsafe fn bind_texture(&mut self, unit: u32, id: TextureId) -> Result<()>;

    unsafe fn delete_texture(&mut self, id: TextureId) -> Result<()>;

    unsafe fn clear(&mut self, color: Color<f32>) -> Result<()>;

    unsafe fn set_viewport(&mut self, dimensions: Vector2<u32>) -> Result<()>;

    /// Returns the value last uploaded into `location` of program `id`.
    fn uniform(&self, id: ProgramId, location: UniformLocation) -> Option<UniformVariable>;

    fn info(&self) -> VideoFrameInfo;

    /// Advance one frame, it will be called every frames.
    fn advance(&mut self);
}

/// Creates the OpenGL backend.
///
/// # Safety
///
/// The GL function pointers must be loaded and the context current.
pub unsafe fn new() -> Result<Box<dyn Visitor>> {
    let visitor = self::gl::visitor::GLVisitor::new()?;
    Ok(Box::new(visitor))
}

pub fn new_headless() -> Box<dyn Visitor> {
    Box::new(self::headless::HeadlessVisitor::new())
}
