//! A backend without any GPU behind it.
//!
//! `HeadlessVisitor` keeps just enough bookkeeping to behave like a strict
//! driver: shaders are validated lexically, unused uniforms are optimized out,
//! and every object is tracked until it is deleted.

use crate::errors::*;
use crate::math::prelude::{Color, Vector2};
use crate::utils::prelude::FastHashMap;

use crate::video::geometry::VertexLayout;
use crate::video::texture::{TextureData, TextureParams};
use crate::video::{BufferId, BufferKind, ProgramId, ShaderId, TextureId, VertexArrayId};
use crate::video::{UniformLocation, UniformVariable, VideoFrameInfo};

use super::utils;
use super::Visitor;

struct HeadlessShader {
    stage: ShaderStage,
    src: String,
}

struct HeadlessBuffer {
    kind: BufferKind,
    len: usize,
}

struct HeadlessVertexArray {
    vbo: BufferId,
    ibo: Option<BufferId>,
}

pub struct HeadlessVisitor {
    counter: u32,
    shaders: FastHashMap<ShaderId, HeadlessShader>,
    programs: FastHashMap<ProgramId, FastHashMap<String, UniformLocation>>,
    buffers: FastHashMap<BufferId, HeadlessBuffer>,
    vertex_arrays: FastHashMap<VertexArrayId, HeadlessVertexArray>,
    textures: FastHashMap<TextureId, Vector2<u32>>,
    binded_program: Option<ProgramId>,
    uniforms: FastHashMap<(ProgramId, UniformLocation), UniformVariable>,
    info: VideoFrameInfo,
}

impl HeadlessVisitor {
    pub fn new() -> Self {
        HeadlessVisitor {
            counter: 0,
            shaders: FastHashMap::default(),
            programs: FastHashMap::default(),
            buffers: FastHashMap::default(),
            vertex_arrays: FastHashMap::default(),
            textures: FastHashMap::default(),
            binded_program: None,
            uniforms: FastHashMap::default(),
            info: VideoFrameInfo::default(),
        }
    }

    fn next(&mut self) -> u32 {
        // Zero is never a valid object name.
        self.counter += 1;
        self.counter
    }

    fn bound(&self) -> Result<ProgramId> {
        self.binded_program
            .ok_or_else(|| Error::Backend("No program is bound.".into()))
    }

    fn vertex_array(&self, id: VertexArrayId) -> Result<&HeadlessVertexArray> {
        self.vertex_arrays
            .get(&id)
            .ok_or_else(|| Error::Backend(format!("{} is invalid.", id)))
    }

    fn buffer_len(&self, id: BufferId) -> usize {
        self.buffers.get(&id).map(|v| v.len).unwrap_or(0)
    }
}

impl Default for HeadlessVisitor {
    fn default() -> Self {
        HeadlessVisitor::new()
    }
}

/// Checks `src` the way a picky driver would, returning the diagnostics on
/// failure.
fn validate(src: &str) -> ::std::result::Result<(), String> {
    let stripped = utils::strip_comments(src);

    match stripped.lines().find(|v| !v.trim().is_empty()) {
        Some(line) if line.trim_start().starts_with("#version") => {}
        _ => return Err("0:1(1): error: #version directive must appear first".into()),
    }

    if let Some(line) = utils::unbalanced_brace(&stripped) {
        return Err(format!("0:{}(1): error: syntax error, unbalanced braces", line));
    }

    if !utils::identifiers(&stripped).any(|v| v == "main") {
        return Err("0:0(0): error: function `main' is not defined".into());
    }

    Ok(())
}

impl Visitor for HeadlessVisitor {
    unsafe fn compile(&mut self, stage: ShaderStage, src: &str) -> Result<ShaderId> {
        if let Err(log) = validate(src) {
            return Err(Error::Compile { stage, log });
        }

        let id = ShaderId(self.next());
        let shader = HeadlessShader {
            stage,
            src: utils::strip_comments(src),
        };

        self.shaders.insert(id, shader);
        Ok(id)
    }

    unsafe fn delete_shader(&mut self, id: ShaderId) -> Result<()> {
        self.shaders
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::Backend(format!("{} is invalid.", id)))
    }

    unsafe fn link(&mut self, shaders: &[ShaderId]) -> Result<ProgramId> {
        let mut stages = Vec::with_capacity(shaders.len());
        for id in shaders {
            let shader = self
                .shaders
                .get(id)
                .ok_or_else(|| Error::Backend(format!("{} is invalid.", id)))?;
            stages.push(shader);
        }

        for stage in &[ShaderStage::Vertex, ShaderStage::Fragment] {
            let n = stages.iter().filter(|v| v.stage == *stage).count();
            if n != 1 {
                return Err(Error::Link(format!(
                    "error: expected exactly one {} shader, found {}",
                    stage, n
                )));
            }
        }

        // Locations are handed out in declaration order, vertex stage first.
        stages.sort_by_key(|v| v.stage != ShaderStage::Vertex);

        let outputs = utils::declarations(&stages[0].src, "out");
        for name in utils::declarations(&stages[1].src, "in") {
            if !outputs.contains(&name) {
                return Err(Error::Link(format!(
                    "error: fragment shader input `{}' has no matching vertex shader output",
                    name
                )));
            }
        }

        let mut uniforms = FastHashMap::default();
        for shader in stages {
            for name in utils::active_uniforms(&shader.src) {
                let location = UniformLocation(uniforms.len() as i32);
                uniforms.entry(name.to_owned()).or_insert(location);
            }
        }

        let id = ProgramId(self.next());
        self.programs.insert(id, uniforms);
        Ok(id)
    }

    unsafe fn delete_program(&mut self, id: ProgramId) -> Result<()> {
        if self.programs.remove(&id).is_none() {
            return Err(Error::Backend(format!("{} is invalid.", id)));
        }

        if self.binded_program == Some(id) {
            self.binded_program = None;
        }

        self.uniforms.retain(|&(program, _), _| program != id);
        Ok(())
    }

    unsafe fn uniform_location(&mut self, id: ProgramId, name: &str) -> Result<UniformLocation> {
        let uniforms = self
            .programs
            .get(&id)
            .ok_or_else(|| Error::Backend(format!("{} is invalid.", id)))?;

        Ok(uniforms
            .get(name)
            .cloned()
            .unwrap_or(UniformLocation::NOT_FOUND))
    }

    unsafe fn bind_program(&mut self, id: ProgramId) -> Result<()> {
        if self.binded_program == Some(id) {
            return Ok(());
        }

        if !self.programs.contains_key(&id) {
            return Err(Error::Backend(format!("{} is invalid.", id)));
        }

        self.binded_program = Some(id);
        self.info.program_switches += 1;
        Ok(())
    }

    unsafe fn bind_uniform(
        &mut self,
        location: UniformLocation,
        variable: &UniformVariable,
    ) -> Result<()> {
        if !location.is_found() {
            return Ok(());
        }

        let program = self.bound()?;
        if !self.programs[&program].values().any(|&v| v == location) {
            return Err(Error::Backend(format!(
                "Uniform location {} does not belong to {}.",
                location.raw(),
                program
            )));
        }

        self.uniforms.insert((program, location), *variable);
        Ok(())
    }

    unsafe fn create_buffer(&mut self, kind: BufferKind, bytes: &[u8]) -> Result<BufferId> {
        let id = BufferId(self.next());
        let buffer = HeadlessBuffer {
            kind,
            len: bytes.len(),
        };

        self.buffers.insert(id, buffer);
        Ok(id)
    }

    unsafe fn delete_buffer(&mut self, id: BufferId) -> Result<()> {
        self.buffers
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::Backend(format!("{} is invalid.", id)))
    }

    unsafe fn create_vertex_array(
        &mut self,
        vbo: BufferId,
        ibo: Option<BufferId>,
        _: &VertexLayout,
    ) -> Result<VertexArrayId> {
        if self.buffers.get(&vbo).map(|v| v.kind) != Some(BufferKind::Vertex) {
            return Err(Error::Backend(format!("{} is not a vertex buffer.", vbo)));
        }

        if let Some(ibo) = ibo {
            if self.buffers.get(&ibo).map(|v| v.kind) != Some(BufferKind::Index) {
                return Err(Error::Backend(format!("{} is not an index buffer.", ibo)));
            }
        }

        let id = VertexArrayId(self.next());
        self.vertex_arrays
            .insert(id, HeadlessVertexArray { vbo, ibo });
        Ok(id)
    }

    unsafe fn delete_vertex_array(&mut self, id: VertexArrayId) -> Result<()> {
        self.vertex_arrays
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::Backend(format!("{} is invalid.", id)))
    }

    unsafe fn draw_elements(&mut self, vao: VertexArrayId, len: u32) -> Result<()> {
        self.bound()?;

        let ibo = self
            .vertex_array(vao)?
            .ibo
            .ok_or_else(|| Error::Backend(format!("{} has no index buffer.", vao)))?;

        if len as usize * 4 > self.buffer_len(ibo) {
            return Err(Error::Backend(format!(
                "Drawing {} indices overflows {}.",
                len, ibo
            )));
        }

        self.info.drawcall += 1;
        self.info.triangles += len / 3;
        Ok(())
    }

    unsafe fn draw_arrays(&mut self, vao: VertexArrayId, len: u32) -> Result<()> {
        self.bound()?;

        let vbo = self.vertex_array(vao)?.vbo;
        if len > 0 && self.buffer_len(vbo) == 0 {
            return Err(Error::Backend(format!("{} is empty.", vbo)));
        }

        self.info.drawcall += 1;
        self.info.triangles += len / 3;
        Ok(())
    }

    unsafe fn create_texture(
        &mut self,
        _: &TextureParams,
        data: &TextureData,
    ) -> Result<TextureId> {
        let expected = data.dimensions.x as usize * data.dimensions.y as usize * 4;
        if data.bytes.len() != expected {
            return Err(Error::Backend(format!(
                "Texture of {:?} expects {} bytes, found {}.",
                data.dimensions,
                expected,
                data.bytes.len()
            )));
        }

        let id = TextureId(self.next());
        self.textures.insert(id, data.dimensions);
        Ok(id)
    }

    unsafe fn bind_texture(&mut self, _: u32, id: TextureId) -> Result<()> {
        if !self.textures.contains_key(&id) {
            return Err(Error::Backend(format!("{} is invalid.", id)));
        }

        Ok(())
    }

    unsafe fn delete_texture(&mut self, id: TextureId) -> Result<()> {
        self.textures
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::Backend(format!("{} is invalid.", id)))
    }

    unsafe fn clear(&mut self, _: Color<f32>) -> Result<()> {
        Ok(())
    }

    unsafe fn set_viewport(&mut self, _: Vector2<u32>) -> Result<()> {
        Ok(())
    }

    fn uniform(&self, id: ProgramId, location: UniformLocation) -> Option<UniformVariable> {
        self.uniforms.get(&(id, location)).cloned()
    }

    fn info(&self) -> VideoFrameInfo {
        let mut info = self.info;
        info.alive_shaders = self.shaders.len() as u32;
        info.alive_programs = self.programs.len() as u32;
        info.alive_buffers = self.buffers.len() as u32;
        info.alive_vertex_arrays = self.vertex_arrays.len() as u32;
        info.alive_textures = self.textures.len() as u32;
        info
    }

    fn advance(&mut self) {
        self.info = VideoFrameInfo::default();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const VS: &str = "#version 330 core
layout (location = 0) in vec3 aPos;
uniform mat4 transform;
void main() {
    gl_Position = transform * vec4(aPos, 1.0);
}
";

    const FS: &str = "#version 330 core
out vec4 FragColor;
uniform vec4 color;
uniform vec4 unused;
void main() {
    FragColor = color;
}
";

    unsafe fn program(visitor: &mut HeadlessVisitor) -> ProgramId {
        let vs = visitor.compile(ShaderStage::Vertex, VS).unwrap();
        let fs = visitor.compile(ShaderStage::Fragment, FS).unwrap();
        let id = visitor.link(&[vs, fs]).unwrap();
        visitor.delete_shader(vs).unwrap();
        visitor.delete_shader(fs).unwrap();
        id
    }

    #[test]
    fn compile_errors() {
        let mut visitor = HeadlessVisitor::new();
        unsafe {
            let err = visitor
                .compile(ShaderStage::Fragment, "void main() {}")
                .unwrap_err();

            match err {
                Error::Compile { stage, log } => {
                    assert_eq!(stage, ShaderStage::Fragment);
                    assert!(log.contains("#version"));
                }
                _ => panic!("unexpected error {:?}", err),
            }

            let err = visitor
                .compile(ShaderStage::Vertex, "#version 330 core\nvoid main() {\n")
                .unwrap_err();
            assert!(format!("{}", err).contains("unbalanced"));
        }

        assert_eq!(visitor.info().alive_shaders, 0);
    }

    #[test]
    fn link_requires_both_stages() {
        let mut visitor = HeadlessVisitor::new();
        unsafe {
            let vs = visitor.compile(ShaderStage::Vertex, VS).unwrap();
            match visitor.link(&[vs]) {
                Err(Error::Link(log)) => assert!(log.contains("fragment")),
                v => panic!("unexpected result {:?}", v),
            }
        }

        assert_eq!(visitor.info().alive_programs, 0);
    }

    #[test]
    fn link_checks_stage_interface() {
        let fs = "#version 330 core
in vec2 uv;
out vec4 FragColor;
void main() {
    FragColor = vec4(uv, 0.0, 1.0);
}
";

        let mut visitor = HeadlessVisitor::new();
        unsafe {
            let vs = visitor.compile(ShaderStage::Vertex, VS).unwrap();
            let fs = visitor.compile(ShaderStage::Fragment, fs).unwrap();
            match visitor.link(&[fs, vs]) {
                Err(Error::Link(log)) => assert!(log.contains("`uv'")),
                v => panic!("unexpected result {:?}", v),
            }
        }

        assert_eq!(visitor.info().alive_programs, 0);
    }

    #[test]
    fn uniforms() {
        let mut visitor = HeadlessVisitor::new();
        unsafe {
            let id = program(&mut visitor);
            let transform = visitor.uniform_location(id, "transform").unwrap();
            let color = visitor.uniform_location(id, "color").unwrap();

            assert_eq!(transform, UniformLocation(0));
            assert_eq!(color, UniformLocation(1));
            assert_eq!(
                visitor.uniform_location(id, "unused").unwrap(),
                UniformLocation::NOT_FOUND
            );

            let v = UniformVariable::Vector4([1.0, 0.0, 0.0, 1.0]);
            assert!(visitor.bind_uniform(color, &v).is_err());

            visitor.bind_program(id).unwrap();
            visitor.bind_program(id).unwrap();
            visitor.bind_uniform(color, &v).unwrap();
            visitor
                .bind_uniform(UniformLocation::NOT_FOUND, &v)
                .unwrap();

            assert!(visitor.bind_uniform(UniformLocation(7), &v).is_err());
            assert_eq!(visitor.uniform(id, color), Some(v));
            assert_eq!(visitor.info().program_switches, 1);
        }
    }

    #[test]
    fn draw() {
        let mut visitor = HeadlessVisitor::new();
        unsafe {
            let id = program(&mut visitor);
            let vbo = visitor.create_buffer(BufferKind::Vertex, &[0; 48]).unwrap();
            let ibo = visitor.create_buffer(BufferKind::Index, &[0; 24]).unwrap();
            let layout = VertexLayout::position();

            assert!(visitor.create_vertex_array(ibo, None, &layout).is_err());
            let vao = visitor.create_vertex_array(vbo, Some(ibo), &layout).unwrap();

            assert!(visitor.draw_elements(vao, 6).is_err());
            visitor.bind_program(id).unwrap();
            visitor.draw_elements(vao, 6).unwrap();
            assert!(visitor.draw_elements(vao, 9).is_err());

            let info = visitor.info();
            assert_eq!(info.drawcall, 1);
            assert_eq!(info.triangles, 2);
            assert_eq!(info.alive_buffers, 2);
            assert_eq!(info.alive_vertex_arrays, 1);

            visitor.advance();
            assert_eq!(visitor.info().drawcall, 0);
            assert_eq!(visitor.info().alive_buffers, 2);

            visitor.delete_vertex_array(vao).unwrap();
            assert!(visitor.delete_vertex_array(vao).is_err());
        }
    }
}
