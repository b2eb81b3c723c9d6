//! GPU resources and the backends that create them.
//!
//! All the wrappers in this module hold a clone of the `Device` they were
//! created with, and hand their GPU objects back to it exactly once: either
//! through an explicit `del`, or when they are dropped. None of them is
//! `Clone`, so ownership of a GPU object can only be moved.

/// Declares a driver-assigned object id.
macro_rules! impl_gl_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub(crate) u32);

        impl $name {
            /// Returns the raw name assigned by the driver.
            #[inline]
            pub fn raw(self) -> u32 {
                self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

impl_gl_id!(ShaderId);
impl_gl_id!(ProgramId);
impl_gl_id!(BufferId);
impl_gl_id!(VertexArrayId);
impl_gl_id!(TextureId);

pub mod backends;
pub mod geometry;
pub mod shader;
pub mod texture;

mod device;
pub use self::device::{Device, VideoFrameInfo};

pub mod prelude {
    pub use super::geometry::{Geometry, VertexAttribute, VertexLayout};
    pub use super::shader::ShaderProgram;
    pub use super::texture::{Texture, TextureData, TextureFilter, TextureParams, TextureWrap};
    pub use super::{Device, UniformLocation, UniformVariable, VideoFrameInfo};
    pub use crate::errors::ShaderStage;
}

/// The location of a uniform variable inside a linked program.
///
/// `UniformLocation::NOT_FOUND` is what the driver hands out for names that
/// are not active uniforms; uploading to it is a silent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UniformLocation(pub(crate) i32);

impl UniformLocation {
    pub const NOT_FOUND: UniformLocation = UniformLocation(-1);

    #[inline]
    pub fn raw(self) -> i32 {
        self.0
    }

    #[inline]
    pub fn is_found(self) -> bool {
        self.0 >= 0
    }
}

/// A value that can be uploaded into a uniform slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformVariable {
    I32(i32),
    Vector4([f32; 4]),
    /// Column-major 4x4 matrix.
    Matrix4([[f32; 4]; 4]),
}

/// The binding target of a buffer object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    Vertex,
    Index,
}
