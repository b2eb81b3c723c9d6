//! Shader programs and their uniform-location cache.

use std::fs;
use std::io;
use std::path::Path;

use crate::errors::*;
use crate::math::prelude::Matrix4;
use crate::utils::prelude::FastHashMap;

use super::backends::Visitor;
use super::{Device, ProgramId, ShaderId, UniformLocation, UniformVariable};

/// A linked vertex + fragment program, together with the locations of the
/// uniforms it was asked about.
pub struct ShaderProgram {
    device: Device,
    id: ProgramId,
    uniforms: FastHashMap<String, UniformLocation>,
    released: bool,
}

impl ShaderProgram {
    /// Reads, compiles and links the sources at `vs` and `fs`, then resolves
    /// every name in `uniforms`.
    pub fn new<P1, P2, T>(device: &Device, vs: P1, fs: P2, uniforms: &[T]) -> Result<Self>
    where
        P1: AsRef<Path>,
        P2: AsRef<Path>,
        T: AsRef<str>,
    {
        let vs_src = read_source(vs.as_ref())?;
        let fs_src = read_source(fs.as_ref())?;

        let program = Self::from_sources(device, &vs_src, &fs_src, uniforms)?;
        info!(
            "Loads shader program {} from {:?} and {:?}.",
            program.id,
            vs.as_ref(),
            fs.as_ref()
        );

        Ok(program)
    }

    /// Compiles and links in-memory sources, then resolves every name in
    /// `uniforms`.
    pub fn from_sources<T: AsRef<str>>(
        device: &Device,
        vs: &str,
        fs: &str,
        uniforms: &[T],
    ) -> Result<Self> {
        let id = {
            let mut visitor = device.visitor();

            unsafe {
                let vs = visitor.compile(ShaderStage::Vertex, vs)?;
                let fs = match visitor.compile(ShaderStage::Fragment, fs) {
                    Ok(fs) => fs,
                    Err(err) => {
                        if let Err(e) = visitor.delete_shader(vs) {
                            warn!("Failed to release shader {}. {}", vs, e);
                        }

                        return Err(err);
                    }
                };

                let program = visitor.link(&[vs, fs]);
                let released = release_stages(&mut **visitor, &[vs, fs]);

                match (program, released) {
                    (Ok(id), Ok(())) => id,
                    (Ok(id), Err(err)) => {
                        if let Err(e) = visitor.delete_program(id) {
                            warn!("Failed to release shader program {}. {}", id, e);
                        }

                        return Err(err);
                    }
                    (Err(err), _) => return Err(err),
                }
            }
        };

        let mut program = ShaderProgram {
            device: device.clone(),
            id,
            uniforms: FastHashMap::default(),
            released: false,
        };

        for name in uniforms {
            program.register_uniform(name.as_ref())?;
        }

        Ok(program)
    }

    #[inline]
    pub fn id(&self) -> ProgramId {
        self.id
    }

    /// Makes this program the current one.
    pub fn use_program(&self) -> Result<()> {
        unsafe { self.device.visitor().bind_program(self.id) }
    }

    /// Returns the cached location of `name`.
    ///
    /// The location is `UniformLocation::NOT_FOUND` if the driver does not
    /// consider `name` an active uniform.
    pub fn uniform_location(&self, name: &str) -> Result<UniformLocation> {
        self.uniforms
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownUniform(name.to_owned()))
    }

    /// Resolves `name` and adds it to the cache.
    pub fn register_uniform(&mut self, name: &str) -> Result<UniformLocation> {
        if let Some(&location) = self.uniforms.get(name) {
            return Ok(location);
        }

        let location = unsafe { self.device.visitor().uniform_location(self.id, name)? };
        if !location.is_found() {
            debug!("Uniform {:?} is not active in {}.", name, self.id);
        }

        self.uniforms.insert(name.to_owned(), location);
        Ok(location)
    }

    /// The names and locations in the cache.
    pub fn uniforms(&self) -> impl Iterator<Item = (&str, UniformLocation)> {
        self.uniforms.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Uploads an integer, typically a texture unit for a sampler.
    pub fn set_uniform_1i(&self, location: UniformLocation, v: i32) -> Result<()> {
        self.set_uniform(location, UniformVariable::I32(v))
    }

    pub fn set_uniform_4f(
        &self,
        location: UniformLocation,
        x: f32,
        y: f32,
        z: f32,
        w: f32,
    ) -> Result<()> {
        self.set_uniform(location, UniformVariable::Vector4([x, y, z, w]))
    }

    pub fn set_uniform_matrix4fv(&self, location: UniformLocation, m: &Matrix4<f32>) -> Result<()> {
        self.set_uniform(location, UniformVariable::Matrix4((*m).into()))
    }

    /// Uploads `v` into the current program, which is not necessarily this
    /// one.
    pub fn set_uniform(&self, location: UniformLocation, v: UniformVariable) -> Result<()> {
        unsafe { self.device.visitor().bind_uniform(location, &v) }
    }

    /// Releases the program now.
    pub fn del(mut self) -> Result<()> {
        self.release()
    }

    fn release(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }

        self.released = true;
        unsafe { self.device.visitor().delete_program(self.id) }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            warn!("Failed to release shader program {}. {}", self.id, err);
        }
    }
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => Error::FileNotFound(path.to_owned()),
        _ => Error::Io(format!("{:?}: {}", path, err)),
    })
}

/// Deletes every stage, returning the first failure.
unsafe fn release_stages(visitor: &mut dyn Visitor, stages: &[ShaderId]) -> Result<()> {
    let mut result = Ok(());
    for &v in stages {
        result = result.and(visitor.delete_shader(v));
    }

    result
}
