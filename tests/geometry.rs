extern crate glsteps;
extern crate rand;

use rand::Rng;

use glsteps::errors::*;
use glsteps::math::prelude::*;
use glsteps::video::prelude::*;

const VS: &str = "#version 330 core
layout (location = 0) in vec3 pos;
layout (location = 1) in vec2 tex_coord;
out vec2 uv;
void main() {
    gl_Position = vec4(pos, 1.0);
    uv = tex_coord;
}
";

const FS: &str = "#version 330 core
in vec2 uv;
out vec4 FragColor;
uniform vec4 in_color;
void main() {
    FragColor = in_color * vec4(uv, 1.0, 1.0);
}
";

#[rustfmt::skip]
const QUAD: [f32; 12] = [
    -0.5, -0.5, 0.0,
    -0.5,  0.5, 0.0,
     0.5, -0.5, 0.0,
     0.5,  0.5, 0.0,
];

#[rustfmt::skip]
const TEXTURED_QUAD: [f32; 20] = [
     0.5,  0.5, 0.0,  1.0, 1.0,
     0.5, -0.5, 0.0,  1.0, 0.0,
    -0.5, -0.5, 0.0,  0.0, 0.0,
    -0.5,  0.5, 0.0,  0.0, 1.0,
];

const INDICES: [u32; 6] = [0, 1, 2, 3, 1, 2];

fn program(device: &Device) -> ShaderProgram {
    let program = ShaderProgram::from_sources(device, VS, FS, &["in_color"]).unwrap();
    program.use_program().unwrap();
    program
}

#[test]
fn release() {
    let device = Device::headless();
    let before = device.info();

    let quad = Geometry::new(&device, &VertexLayout::position(), &QUAD, &INDICES).unwrap();
    assert_eq!(device.info().alive_buffers, before.alive_buffers + 2);
    assert_eq!(device.info().alive_vertex_arrays, before.alive_vertex_arrays + 1);
    quad.del().unwrap();
    assert_eq!(device.info(), before);

    {
        let _quad = Geometry::new(&device, &VertexLayout::position(), &QUAD, &INDICES).unwrap();
        let _triangle = Geometry::arrays(&device, &VertexLayout::position(), &QUAD[..9]).unwrap();
        assert_eq!(device.info().alive_buffers, before.alive_buffers + 3);
    }

    assert_eq!(device.info(), before);
}

#[test]
fn one_draw_per_geometry() {
    let device = Device::headless();
    let _program = program(&device);

    let layouts = [
        (VertexLayout::position(), &QUAD[..]),
        (VertexLayout::position_texcoord(), &TEXTURED_QUAD[..]),
    ];

    for (layout, vertices) in layouts.iter() {
        let quad = Geometry::new(&device, layout, vertices, &INDICES).unwrap();
        assert_eq!(quad.len(), 6);
        assert!(quad.is_indexed());

        device.advance();
        quad.draw().unwrap();

        let info = device.info();
        assert_eq!(info.drawcall, 1);
        assert_eq!(info.triangles, 2);
    }
}

#[test]
fn random_meshes() {
    let device = Device::headless();
    let _program = program(&device);
    let layout = VertexLayout::position_texcoord();
    let mut rng = rand::thread_rng();

    for _ in 0..32 {
        let n: usize = rng.gen_range(1, 64);
        let vertices: Vec<f32> = (0..n * 5).map(|_| rng.gen_range(-1.0, 1.0)).collect();
        let triangles: usize = rng.gen_range(0, 32);
        let indices: Vec<u32> = (0..triangles * 3)
            .map(|_| rng.gen_range(0, n as u32))
            .collect();

        let mesh = Geometry::new(&device, &layout, &vertices, &indices).unwrap();
        assert_eq!(mesh.len() as usize, indices.len());

        device.advance();
        mesh.draw().unwrap();
        assert_eq!(device.info().drawcall, 1);
        assert_eq!(device.info().triangles as usize, triangles);
    }

    assert_eq!(device.info().alive_buffers, 0);
}

#[test]
fn invalid_geometry() {
    let device = Device::headless();
    let before = device.info();

    match Geometry::new(&device, &VertexLayout::position(), &QUAD[..10], &INDICES) {
        Err(Error::InvalidGeometry(_)) => {}
        Err(err) => panic!("unexpected error {}", err),
        Ok(_) => panic!("accepted a partial vertex"),
    }

    match Geometry::new(&device, &VertexLayout::position(), &QUAD, &[0, 1, 4]) {
        Err(Error::InvalidGeometry(_)) => {}
        Err(err) => panic!("unexpected error {}", err),
        Ok(_) => panic!("accepted an index out of range"),
    }

    let layout = VertexLayout::build().finish();
    assert!(Geometry::new(&device, &layout, &QUAD, &INDICES).is_err());

    assert_eq!(device.info(), before);
}

#[test]
fn empty() {
    let device = Device::headless();
    let _program = program(&device);

    let empty = Geometry::new(&device, &VertexLayout::position(), &[], &[]).unwrap();
    assert!(empty.is_empty());
    empty.draw().unwrap();
    assert_eq!(device.info().triangles, 0);
}

#[test]
fn color() {
    let device = Device::headless();
    let program = program(&device);
    let location = program.uniform_location("in_color").unwrap();

    let red = Color::new(0.8, 0.0, 0.0, 1.0);
    let layout = VertexLayout::position_texcoord();
    let mut quad = Geometry::new(&device, &layout, &TEXTURED_QUAD, &INDICES)
        .unwrap()
        .with_color(red, location);

    quad.draw().unwrap();
    assert_eq!(
        device.uniform(program.id(), location),
        Some(UniformVariable::Vector4([0.8, 0.0, 0.0, 1.0]))
    );

    quad.set_color(Color::blue());
    assert_eq!(quad.color(), Some(Color::blue()));
    quad.draw().unwrap();
    assert_eq!(
        device.uniform(program.id(), location),
        Some(UniformVariable::Vector4([0.0, 0.0, 1.0, 1.0]))
    );
}

#[test]
fn arrays() {
    let device = Device::headless();
    let _program = program(&device);

    let triangle = Geometry::arrays(&device, &VertexLayout::position(), &QUAD[..9]).unwrap();
    assert!(!triangle.is_indexed());
    assert_eq!(triangle.len(), 3);

    triangle.draw().unwrap();
    assert_eq!(device.info().drawcall, 1);
    assert_eq!(device.info().triangles, 1);
}

#[test]
fn draw_requires_program() {
    let device = Device::headless();
    let quad = Geometry::new(&device, &VertexLayout::position(), &QUAD, &INDICES).unwrap();
    assert!(quad.draw().is_err());
    assert_eq!(device.info().drawcall, 0);
}
