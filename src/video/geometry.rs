//! Vertex layouts and the `Geometry` wrapper over a vertex buffer, an index
//! buffer and the vertex array recording both.

use std::mem;
use std::slice;

use smallvec::SmallVec;

use crate::errors::*;
use crate::math::prelude::Color;

use super::{BufferId, BufferKind, Device, UniformLocation, UniformVariable, VertexArrayId};

/// One generic vertex attribute made of `size` consecutive `f32`s.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct VertexAttribute {
    /// The attribute location in the vertex shader.
    pub location: u32,
    /// The number of components, 1 to 4.
    pub size: u8,
    /// Byte offset from the start of a vertex.
    pub offset: u32,
}

/// `VertexLayout` describes how interleaved `f32` vertex data is split into
/// attributes. Offsets and stride follow from the attribute order.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct VertexLayout {
    stride: u32,
    elements: SmallVec<[VertexAttribute; 4]>,
}

impl VertexLayout {
    /// Creates a new an empty `VertexLayoutBuilder`.
    #[inline]
    pub fn build() -> VertexLayoutBuilder {
        VertexLayoutBuilder::new()
    }

    /// Positions only: 3 floats at location 0.
    pub fn position() -> Self {
        VertexLayout::build().with(0, 3).finish()
    }

    /// Positions at location 0 followed by texture coordinates at location 1.
    pub fn position_texcoord() -> Self {
        VertexLayout::build().with(0, 3).with(1, 2).finish()
    }

    /// Stride of single vertex structure in bytes.
    #[inline]
    pub fn stride(&self) -> u32 {
        self.stride
    }

    #[inline]
    pub fn floats_per_vertex(&self) -> usize {
        self.stride as usize / mem::size_of::<f32>()
    }

    /// Returns the attribute bound to `location`.
    pub fn element(&self, location: u32) -> Option<VertexAttribute> {
        self.elements.iter().find(|v| v.location == location).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VertexAttribute> {
        self.elements.iter()
    }
}

#[derive(Default)]
pub struct VertexLayoutBuilder {
    elements: SmallVec<[(u32, u8); 4]>,
}

impl VertexLayoutBuilder {
    #[inline]
    pub fn new() -> Self {
        Default::default()
    }

    /// Appends an attribute, or resizes the attribute already bound to
    /// `location` in place.
    ///
    /// # Panics
    ///
    /// Panics if `size` is not between 1 and 4.
    pub fn with(&mut self, location: u32, size: u8) -> &mut Self {
        assert!(size >= 1 && size <= 4, "Invalid attribute size {}.", size);

        match self.elements.iter_mut().find(|v| v.0 == location) {
            Some(v) => v.1 = size,
            None => self.elements.push((location, size)),
        }

        self
    }

    pub fn finish(&mut self) -> VertexLayout {
        let mut layout = VertexLayout::default();
        for &(location, size) in &self.elements {
            layout.elements.push(VertexAttribute {
                location,
                size,
                offset: layout.stride,
            });

            layout.stride += u32::from(size) * mem::size_of::<f32>() as u32;
        }

        layout
    }
}

/// Triangles stored in GPU memory.
///
/// Indexed geometry owns a vertex buffer, an index buffer and a vertex array;
/// geometry built with `Geometry::arrays` has no index buffer and is drawn
/// vertex by vertex.
pub struct Geometry {
    device: Device,
    vbo: BufferId,
    ibo: Option<BufferId>,
    vao: VertexArrayId,
    len: u32,
    color: Option<(Color<f32>, UniformLocation)>,
    released: bool,
}

impl Geometry {
    /// Uploads interleaved `vertices` described by `layout` and triangle
    /// `indices` into a new indexed geometry.
    pub fn new(
        device: &Device,
        layout: &VertexLayout,
        vertices: &[f32],
        indices: &[u32],
    ) -> Result<Self> {
        let n = vertex_count(layout, vertices)?;

        if let Some(&v) = indices.iter().find(|&&v| v as usize >= n) {
            return Err(Error::InvalidGeometry(format!(
                "Index {} is out of range, there are only {} vertices.",
                v, n
            )));
        }

        let geometry = Self::create(device, layout, vertices, Some(indices))?;
        debug!(
            "Creates geometry with {} vertices and {} indices.",
            n,
            indices.len()
        );

        Ok(geometry)
    }

    /// Uploads interleaved `vertices` into a new geometry without indices.
    pub fn arrays(device: &Device, layout: &VertexLayout, vertices: &[f32]) -> Result<Self> {
        let n = vertex_count(layout, vertices)?;
        let geometry = Self::create(device, layout, vertices, None)?;
        debug!("Creates geometry with {} vertices.", n);
        Ok(geometry)
    }

    fn create(
        device: &Device,
        layout: &VertexLayout,
        vertices: &[f32],
        indices: Option<&[u32]>,
    ) -> Result<Self> {
        let mut visitor = device.visitor();

        unsafe {
            let vbo = visitor.create_buffer(BufferKind::Vertex, as_bytes(vertices))?;

            let ibo = match indices {
                Some(indices) => match visitor.create_buffer(BufferKind::Index, as_bytes(indices)) {
                    Ok(ibo) => Some(ibo),
                    Err(err) => {
                        if let Err(e) = visitor.delete_buffer(vbo) {
                            warn!("Failed to release {}. {}", vbo, e);
                        }

                        return Err(err);
                    }
                },
                None => None,
            };

            let vao = match visitor.create_vertex_array(vbo, ibo, layout) {
                Ok(vao) => vao,
                Err(err) => {
                    let mut released = visitor.delete_buffer(vbo);
                    if let Some(ibo) = ibo {
                        released = released.and(visitor.delete_buffer(ibo));
                    }

                    if let Err(e) = released {
                        warn!("Failed to release the buffers of a broken geometry. {}", e);
                    }

                    return Err(err);
                }
            };

            let len = match indices {
                Some(indices) => indices.len(),
                None => vertices.len() / layout.floats_per_vertex().max(1),
            };

            Ok(Geometry {
                device: device.clone(),
                vbo,
                ibo,
                vao,
                len: len as u32,
                color: None,
                released: false,
            })
        }
    }

    /// Attaches a color that `draw` uploads into `location` of the current
    /// program.
    pub fn with_color(mut self, color: Color<f32>, location: UniformLocation) -> Self {
        self.color = Some((color, location));
        self
    }

    /// Changes the attached color. Does nothing without a prior `with_color`.
    pub fn set_color(&mut self, color: Color<f32>) {
        if let Some(ref mut v) = self.color {
            v.0 = color;
        }
    }

    pub fn color(&self) -> Option<Color<f32>> {
        self.color.map(|v| v.0)
    }

    /// The number of indices, or vertices for geometry without indices.
    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.ibo.is_some()
    }

    /// Issues exactly one draw call covering the whole geometry with the
    /// current program.
    pub fn draw(&self) -> Result<()> {
        let mut visitor = self.device.visitor();

        unsafe {
            if let Some((color, location)) = self.color {
                visitor.bind_uniform(location, &UniformVariable::Vector4(color.into()))?;
            }

            if self.ibo.is_some() {
                visitor.draw_elements(self.vao, self.len)
            } else {
                visitor.draw_arrays(self.vao, self.len)
            }
        }
    }

    /// Releases the GPU objects now.
    pub fn del(mut self) -> Result<()> {
        self.release()
    }

    fn release(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }

        self.released = true;
        let mut visitor = self.device.visitor();

        // Every object is handed back even if an earlier one fails.
        unsafe {
            let mut result = visitor.delete_vertex_array(self.vao);
            if let Some(ibo) = self.ibo {
                result = result.and(visitor.delete_buffer(ibo));
            }

            result.and(visitor.delete_buffer(self.vbo))
        }
    }
}

impl Drop for Geometry {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            warn!("Failed to release geometry. {}", err);
        }
    }
}

fn vertex_count(layout: &VertexLayout, vertices: &[f32]) -> Result<usize> {
    let n = layout.floats_per_vertex();
    if n == 0 {
        return Err(Error::InvalidGeometry("Vertex layout is empty.".into()));
    }

    if vertices.len() % n != 0 {
        return Err(Error::InvalidGeometry(format!(
            "{} floats is not a whole number of {}-float vertices.",
            vertices.len(),
            n
        )));
    }

    Ok(vertices.len() / n)
}

/// Views a slice of plain numbers as raw bytes.
fn as_bytes<T: Copy>(values: &[T]) -> &[u8] {
    unsafe { slice::from_raw_parts(values.as_ptr() as *const u8, mem::size_of_val(values)) }
}
