use std::ffi::CString;
use std::os::raw::c_void;
use std::ptr;

use gl;
use gl::types::*;
use smallvec::SmallVec;

use crate::errors::*;
use crate::math::prelude::{Color, Vector2};
use crate::utils::prelude::{FastHashMap, FastHashSet};

use crate::video::geometry::VertexLayout;
use crate::video::texture::{TextureData, TextureFilter, TextureParams, TextureWrap};
use crate::video::{BufferId, BufferKind, ProgramId, ShaderId, TextureId, VertexArrayId};
use crate::video::{UniformLocation, UniformVariable, VideoFrameInfo};

use super::super::Visitor;
use super::capabilities::Capabilities;

struct GLMutableState {
    binded_program: Option<ProgramId>,
    binded_vao: Option<VertexArrayId>,
    binded_textures: SmallVec<[Option<TextureId>; 8]>,
    active_texture_unit: u32,
    uniforms: FastHashMap<(ProgramId, UniformLocation), UniformVariable>,
    info: VideoFrameInfo,
}

pub struct GLVisitor {
    state: GLMutableState,
    shaders: FastHashSet<ShaderId>,
    programs: FastHashSet<ProgramId>,
    buffers: FastHashMap<BufferId, BufferKind>,
    vertex_arrays: FastHashSet<VertexArrayId>,
    textures: FastHashSet<TextureId>,
}

impl GLVisitor {
    pub unsafe fn new() -> Result<Self> {
        let capabilities = Capabilities::parse()?;
        info!("GLVisitor {:#?}", capabilities);
        check_capabilities(&capabilities)?;

        let state = GLMutableState {
            binded_program: None,
            binded_vao: None,
            binded_textures: SmallVec::new(),
            active_texture_unit: 0,
            uniforms: FastHashMap::default(),
            info: VideoFrameInfo::default(),
        };

        Ok(GLVisitor {
            state,
            shaders: FastHashSet::default(),
            programs: FastHashSet::default(),
            buffers: FastHashMap::default(),
            vertex_arrays: FastHashSet::default(),
            textures: FastHashSet::default(),
        })
    }
}

impl Visitor for GLVisitor {
    unsafe fn compile(&mut self, stage: ShaderStage, src: &str) -> Result<ShaderId> {
        let c_str = CString::new(src.as_bytes())
            .map_err(|_| Error::Backend("Shader source contains a nul byte.".into()))?;

        let tp = match stage {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        };

        let shader = gl::CreateShader(tp);
        if shader == 0 {
            check()?;
            return Err(Error::Backend("[GL] Failed to create shader object.".into()));
        }

        gl::ShaderSource(shader, 1, &c_str.as_ptr(), ptr::null());
        gl::CompileShader(shader);

        // Get the compile status
        let mut status = GLint::from(gl::FALSE);
        gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut status);

        // Fail on error
        if status != GLint::from(gl::TRUE) {
            let mut len = 0;
            gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
            let mut buf = vec![0u8; len.max(1) as usize];
            gl::GetShaderInfoLog(
                shader,
                buf.len() as GLsizei,
                ptr::null_mut(),
                buf.as_mut_ptr() as *mut GLchar,
            );
            gl::DeleteShader(shader);

            return Err(Error::Compile {
                stage,
                log: info_log(buf),
            });
        }

        if let Err(err) = check() {
            gl::DeleteShader(shader);
            return Err(err);
        }

        let id = ShaderId(shader);
        self.shaders.insert(id);
        Ok(id)
    }

    unsafe fn delete_shader(&mut self, id: ShaderId) -> Result<()> {
        if !self.shaders.remove(&id) {
            return Err(Error::Backend(format!("{} is invalid.", id)));
        }

        gl::DeleteShader(id.0);
        check()
    }

    unsafe fn link(&mut self, shaders: &[ShaderId]) -> Result<ProgramId> {
        let program = gl::CreateProgram();
        if program == 0 {
            check()?;
            return Err(Error::Backend("[GL] Failed to create program object.".into()));
        }

        for shader in shaders {
            gl::AttachShader(program, shader.0);
        }

        gl::LinkProgram(program);

        for shader in shaders {
            gl::DetachShader(program, shader.0);
        }

        // Get the link status
        let mut status = GLint::from(gl::FALSE);
        gl::GetProgramiv(program, gl::LINK_STATUS, &mut status);

        // Fail on error
        if status != GLint::from(gl::TRUE) {
            let mut len: GLint = 0;
            gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
            let mut buf = vec![0u8; len.max(1) as usize];
            gl::GetProgramInfoLog(
                program,
                buf.len() as GLsizei,
                ptr::null_mut(),
                buf.as_mut_ptr() as *mut GLchar,
            );
            gl::DeleteProgram(program);

            return Err(Error::Link(info_log(buf)));
        }

        if let Err(err) = check() {
            gl::DeleteProgram(program);
            return Err(err);
        }

        let id = ProgramId(program);
        self.programs.insert(id);
        Ok(id)
    }

    unsafe fn delete_program(&mut self, id: ProgramId) -> Result<()> {
        if !self.programs.remove(&id) {
            return Err(Error::Backend(format!("{} is invalid.", id)));
        }

        if self.state.binded_program == Some(id) {
            self.state.binded_program = None;
        }

        self.state.uniforms.retain(|&(program, _), _| program != id);
        gl::DeleteProgram(id.0);
        check()
    }

    unsafe fn uniform_location(&mut self, id: ProgramId, name: &str) -> Result<UniformLocation> {
        if !self.programs.contains(&id) {
            return Err(Error::Backend(format!("{} is invalid.", id)));
        }

        let c_name = CString::new(name.as_bytes())
            .map_err(|_| Error::Backend(format!("Uniform name {:?} contains a nul byte.", name)))?;

        let location = gl::GetUniformLocation(id.0, c_name.as_ptr());
        check()?;
        Ok(UniformLocation(location))
    }

    unsafe fn bind_program(&mut self, id: ProgramId) -> Result<()> {
        if self.state.binded_program == Some(id) {
            return Ok(());
        }

        if !self.programs.contains(&id) {
            return Err(Error::Backend(format!("{} is invalid.", id)));
        }

        gl::UseProgram(id.0);
        self.state.binded_program = Some(id);
        self.state.info.program_switches += 1;
        check()
    }

    unsafe fn bind_uniform(
        &mut self,
        location: UniformLocation,
        variable: &UniformVariable,
    ) -> Result<()> {
        if !location.is_found() {
            return Ok(());
        }

        let program = self
            .state
            .binded_program
            .ok_or_else(|| Error::Backend("No program is bound.".into()))?;

        // Programs retain uniform values across binds; skip identical uploads.
        if self.state.uniforms.get(&(program, location)) == Some(variable) {
            return Ok(());
        }

        match *variable {
            UniformVariable::I32(v) => gl::Uniform1i(location.0, v),
            UniformVariable::Vector4(v) => gl::Uniform4f(location.0, v[0], v[1], v[2], v[3]),
            UniformVariable::Matrix4(ref v) => {
                gl::UniformMatrix4fv(location.0, 1, gl::FALSE, v.as_ptr() as *const f32)
            }
        }

        check()?;
        self.state.uniforms.insert((program, location), *variable);
        Ok(())
    }

    unsafe fn create_buffer(&mut self, kind: BufferKind, bytes: &[u8]) -> Result<BufferId> {
        // Binding an element buffer would leak into whatever vertex array is bound.
        Self::unbind_vertex_array(&mut self.state);

        let mut id = 0;
        gl::GenBuffers(1, &mut id);
        if id == 0 {
            check()?;
            return Err(Error::Backend("[GL] Failed to generate buffer object.".into()));
        }

        let tp = buffer_target(kind);
        gl::BindBuffer(tp, id);

        let value = if bytes.is_empty() {
            ptr::null()
        } else {
            bytes.as_ptr() as *const c_void
        };

        gl::BufferData(tp, bytes.len() as GLsizeiptr, value, gl::STATIC_DRAW);
        gl::BindBuffer(tp, 0);

        if let Err(err) = check() {
            gl::DeleteBuffers(1, &id);
            return Err(err);
        }

        let id = BufferId(id);
        self.buffers.insert(id, kind);
        Ok(id)
    }

    unsafe fn delete_buffer(&mut self, id: BufferId) -> Result<()> {
        if self.buffers.remove(&id).is_none() {
            return Err(Error::Backend(format!("{} is invalid.", id)));
        }

        gl::DeleteBuffers(1, &id.0);
        check()
    }

    unsafe fn create_vertex_array(
        &mut self,
        vbo: BufferId,
        ibo: Option<BufferId>,
        layout: &VertexLayout,
    ) -> Result<VertexArrayId> {
        if self.buffers.get(&vbo) != Some(&BufferKind::Vertex) {
            return Err(Error::Backend(format!("{} is not a vertex buffer.", vbo)));
        }

        if let Some(ibo) = ibo {
            if self.buffers.get(&ibo) != Some(&BufferKind::Index) {
                return Err(Error::Backend(format!("{} is not an index buffer.", ibo)));
            }
        }

        let mut id = 0;
        gl::GenVertexArrays(1, &mut id);
        if id == 0 {
            check()?;
            return Err(Error::Backend("[GL] Failed to generate vertex array object.".into()));
        }

        gl::BindVertexArray(id);
        gl::BindBuffer(gl::ARRAY_BUFFER, vbo.0);

        // The element buffer binding is recorded by the vertex array.
        if let Some(ibo) = ibo {
            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ibo.0);
        }

        let stride = layout.stride() as GLsizei;
        for element in layout.iter() {
            gl::VertexAttribPointer(
                element.location,
                GLint::from(element.size),
                gl::FLOAT,
                gl::FALSE,
                stride,
                element.offset as usize as *const c_void,
            );
            gl::EnableVertexAttribArray(element.location);
        }

        gl::BindVertexArray(0);
        gl::BindBuffer(gl::ARRAY_BUFFER, 0);
        self.state.binded_vao = None;

        if let Err(err) = check() {
            gl::DeleteVertexArrays(1, &id);
            return Err(err);
        }

        let id = VertexArrayId(id);
        self.vertex_arrays.insert(id);
        Ok(id)
    }

    unsafe fn delete_vertex_array(&mut self, id: VertexArrayId) -> Result<()> {
        if !self.vertex_arrays.remove(&id) {
            return Err(Error::Backend(format!("{} is invalid.", id)));
        }

        if self.state.binded_vao == Some(id) {
            self.state.binded_vao = None;
        }

        gl::DeleteVertexArrays(1, &id.0);
        check()
    }

    unsafe fn draw_elements(&mut self, vao: VertexArrayId, len: u32) -> Result<()> {
        Self::bind_vertex_array(&mut self.state, &self.vertex_arrays, vao)?;

        gl::DrawElements(
            gl::TRIANGLES,
            len as GLsizei,
            gl::UNSIGNED_INT,
            ptr::null(),
        );

        check()?;
        self.state.info.drawcall += 1;
        self.state.info.triangles += len / 3;
        Ok(())
    }

    unsafe fn draw_arrays(&mut self, vao: VertexArrayId, len: u32) -> Result<()> {
        Self::bind_vertex_array(&mut self.state, &self.vertex_arrays, vao)?;

        gl::DrawArrays(gl::TRIANGLES, 0, len as GLsizei);

        check()?;
        self.state.info.drawcall += 1;
        self.state.info.triangles += len / 3;
        Ok(())
    }

    unsafe fn create_texture(
        &mut self,
        params: &TextureParams,
        data: &TextureData,
    ) -> Result<TextureId> {
        let mut id = 0;
        gl::GenTextures(1, &mut id);
        if id == 0 {
            check()?;
            return Err(Error::Backend("[GL] Failed to generate texture object.".into()));
        }

        let texture = TextureId(id);
        Self::bind_texture_unit(&mut self.state, 0, texture);
        Self::bind_texture_params(params.wrap, params.filter, params.mipmaps);

        let value = if data.bytes.is_empty() {
            ptr::null()
        } else {
            data.bytes.as_ptr() as *const c_void
        };

        gl::TexImage2D(
            gl::TEXTURE_2D,
            0,
            gl::RGBA8 as GLint,
            data.dimensions.x as GLsizei,
            data.dimensions.y as GLsizei,
            0,
            gl::RGBA,
            gl::UNSIGNED_BYTE,
            value,
        );

        if params.mipmaps {
            gl::GenerateMipmap(gl::TEXTURE_2D);
        }

        if let Err(err) = check() {
            gl::DeleteTextures(1, &id);
            self.forget_texture(texture);
            return Err(err);
        }

        self.textures.insert(texture);
        Ok(texture)
    }

    unsafe fn bind_texture(&mut self, unit: u32, id: TextureId) -> Result<()> {
        if !self.textures.contains(&id) {
            return Err(Error::Backend(format!("{} is invalid.", id)));
        }

        Self::bind_texture_unit(&mut self.state, unit, id);
        check()
    }

    unsafe fn delete_texture(&mut self, id: TextureId) -> Result<()> {
        if !self.textures.remove(&id) {
            return Err(Error::Backend(format!("{} is invalid.", id)));
        }

        self.forget_texture(id);
        gl::DeleteTextures(1, &id.0);
        check()
    }

    unsafe fn clear(&mut self, color: Color<f32>) -> Result<()> {
        gl::ClearColor(color.r, color.g, color.b, color.a);
        gl::Clear(gl::COLOR_BUFFER_BIT);
        check()
    }

    unsafe fn set_viewport(&mut self, dimensions: Vector2<u32>) -> Result<()> {
        gl::Viewport(0, 0, dimensions.x as GLsizei, dimensions.y as GLsizei);
        check()
    }

    fn uniform(&self, id: ProgramId, location: UniformLocation) -> Option<UniformVariable> {
        self.state.uniforms.get(&(id, location)).cloned()
    }

    fn info(&self) -> VideoFrameInfo {
        let mut info = self.state.info;
        info.alive_shaders = self.shaders.len() as u32;
        info.alive_programs = self.programs.len() as u32;
        info.alive_buffers = self.buffers.len() as u32;
        info.alive_vertex_arrays = self.vertex_arrays.len() as u32;
        info.alive_textures = self.textures.len() as u32;
        info
    }

    fn advance(&mut self) {
        self.state.info = VideoFrameInfo::default();
    }
}

impl GLVisitor {
    unsafe fn bind_vertex_array(
        state: &mut GLMutableState,
        alive: &FastHashSet<VertexArrayId>,
        id: VertexArrayId,
    ) -> Result<()> {
        if state.binded_vao == Some(id) {
            return Ok(());
        }

        if !alive.contains(&id) {
            return Err(Error::Backend(format!("{} is invalid.", id)));
        }

        gl::BindVertexArray(id.0);
        state.binded_vao = Some(id);
        Ok(())
    }

    unsafe fn unbind_vertex_array(state: &mut GLMutableState) {
        if state.binded_vao.is_some() {
            gl::BindVertexArray(0);
            state.binded_vao = None;
        }
    }

    unsafe fn bind_texture_unit(state: &mut GLMutableState, unit: u32, id: TextureId) {
        let index = unit as usize;
        if state.binded_textures.len() <= index {
            state.binded_textures.resize(index + 1, None);
        }

        if state.active_texture_unit != unit {
            gl::ActiveTexture(gl::TEXTURE0 + unit);
            state.active_texture_unit = unit;
        }

        if state.binded_textures[index] != Some(id) {
            gl::BindTexture(gl::TEXTURE_2D, id.0);
            state.binded_textures[index] = Some(id);
        }
    }

    fn forget_texture(&mut self, id: TextureId) {
        for v in self.state.binded_textures.iter_mut() {
            if *v == Some(id) {
                *v = None;
            }
        }
    }

    unsafe fn bind_texture_params(wrap: TextureWrap, filter: TextureFilter, mipmaps: bool) {
        let wrap = match wrap {
            TextureWrap::Repeat => gl::REPEAT,
            TextureWrap::Clamp => gl::CLAMP_TO_EDGE,
        };

        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, wrap as GLint);
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, wrap as GLint);

        let (min_filter, mag_filter) = match filter {
            TextureFilter::Nearest if mipmaps => (gl::NEAREST_MIPMAP_NEAREST, gl::NEAREST),
            TextureFilter::Nearest => (gl::NEAREST, gl::NEAREST),
            TextureFilter::Linear if mipmaps => (gl::LINEAR_MIPMAP_LINEAR, gl::LINEAR),
            TextureFilter::Linear => (gl::LINEAR, gl::LINEAR),
        };

        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, min_filter as GLint);
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, mag_filter as GLint);
    }
}

fn buffer_target(kind: BufferKind) -> GLenum {
    match kind {
        BufferKind::Vertex => gl::ARRAY_BUFFER,
        BufferKind::Index => gl::ELEMENT_ARRAY_BUFFER,
    }
}

fn info_log(mut buf: Vec<u8>) -> String {
    if let Some(nul) = buf.iter().position(|&v| v == 0) {
        buf.truncate(nul);
    }

    let log = String::from_utf8_lossy(&buf).trim().to_owned();
    if log.is_empty() {
        "(the driver reported no diagnostics)".to_owned()
    } else {
        log
    }
}

unsafe fn check_capabilities(caps: &Capabilities) -> Result<()> {
    if !caps.version.is_supported() {
        return Err(Error::Backend(format!(
            "[GL] OpenGL 3.3 core is required, found {:?}.",
            caps.version
        )));
    }

    if !gl::GenVertexArrays::is_loaded() {
        return Err(Error::Backend(
            "[GL] The OpenGL implementation does not supports vertex array objects.".into(),
        ));
    }

    Ok(())
}

unsafe fn check() -> Result<()> {
    let msg = match gl::GetError() {
        gl::NO_ERROR => return Ok(()),
        gl::INVALID_ENUM => "[GL] An unacceptable value is specified for an enumerated argument.",
        gl::INVALID_VALUE => "[GL] A numeric argument is out of range.",
        gl::INVALID_OPERATION => {
            "[GL] The specified operation is not allowed in the current state."
        }
        gl::INVALID_FRAMEBUFFER_OPERATION => {
            "[GL] The command is trying to render to or read from the framebuffer while the \
             currently bound framebuffer is not framebuffer complete."
        }
        gl::OUT_OF_MEMORY => "[GL] There is not enough memory left to execute the command.",
        _ => "[GL] Oops, Unknown OpenGL error.",
    };

    Err(Error::Backend(msg.to_owned()))
}

