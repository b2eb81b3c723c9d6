//! Projection matrices and the clip-space transform they feed.

use cgmath::prelude::*;
use cgmath::{BaseFloat, Matrix4, Rad, Vector3, Vector4};

use crate::errors::*;

/// Projections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection<S: BaseFloat> {
    /// Orthographic projection of an axis-aligned box onto the clip volume.
    Ortho {
        left: S,
        right: S,
        bottom: S,
        top: S,
        near: S,
        far: S,
    },

    /// Perspective projection.
    Perspective {
        /// Field of view in vertical.
        fovy: Rad<S>,
        /// The aspect of width / height.
        aspect: S,
        /// The near clip plane.
        near: S,
        /// The far clip plane.
        far: S,
    },
}

impl<S: BaseFloat> Projection<S> {
    pub fn ortho(left: S, right: S, bottom: S, top: S, near: S, far: S) -> Self {
        Projection::Ortho {
            left,
            right,
            bottom,
            top,
            near,
            far,
        }
    }

    /// A 2D orthographic projection with the near and far planes at -1 and 1.
    pub fn ortho2d(left: S, right: S, bottom: S, top: S) -> Self {
        Self::ortho(left, right, bottom, top, -S::one(), S::one())
    }

    pub fn perspective<A: Into<Rad<S>>>(fovy: A, aspect: S, near: S, far: S) -> Self {
        Projection::Perspective {
            fovy: fovy.into(),
            aspect,
            near,
            far,
        }
    }

    /// Checks that the projection describes a non-degenerate view volume.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Error::InvalidProjection(msg));

        match *self {
            Projection::Perspective {
                fovy,
                aspect,
                near,
                far,
            } => {
                if !(fovy > Rad::zero() && fovy < Rad::turn_div_2()) {
                    return invalid(format!(
                        "The vertical field of view must be within (0, pi), found: {:?}",
                        fovy
                    ));
                }

                if !(aspect > S::zero()) {
                    return invalid(format!(
                        "The aspect ratio must be above zero, found: {:?}",
                        aspect
                    ));
                }

                if !(near > S::zero()) {
                    return invalid(format!(
                        "The near plane distance must be above zero, found: {:?}",
                        near
                    ));
                }

                if !(far > near) {
                    return invalid(format!(
                        "The far plane cannot be closer than the near plane, found: far: {:?}, near: {:?}",
                        far, near
                    ));
                }
            }
            Projection::Ortho {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => {
                if right == left {
                    return invalid(format!("The horizontal extent is empty at {:?}", left));
                }

                if top == bottom {
                    return invalid(format!("The vertical extent is empty at {:?}", bottom));
                }

                if far == near {
                    return invalid(format!("The depth extent is empty at {:?}", near));
                }
            }
        }

        Ok(())
    }

    /// Gets the projection matrix in OpenGL (right handed, depth in [-1, 1])
    /// conventions.
    pub fn to_matrix(&self) -> Matrix4<S> {
        match *self {
            Projection::Ortho {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => cgmath::ortho(left, right, bottom, top, near, far),
            Projection::Perspective {
                fovy,
                aspect,
                near,
                far,
            } => cgmath::perspective(fovy, aspect, near, far),
        }
    }
}

/// Transforms a model-space point into clip space: `projection * model * p`.
pub fn clip_position<S: BaseFloat>(
    projection: &Matrix4<S>,
    model: &Matrix4<S>,
    point: Vector3<S>,
) -> Vector4<S> {
    projection * model * point.extend(S::one())
}
