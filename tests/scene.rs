extern crate glsteps;
#[macro_use]
extern crate approx;

use std::rc::Rc;

use glsteps::math::prelude::*;
use glsteps::scene::{Scene, Sprite, SpriteIndex};
use glsteps::video::prelude::*;

const VS: &str = "#version 330 core
layout (location = 0) in vec3 pos;
layout (location = 1) in vec2 tex_coord;
out vec2 uv;
uniform mat4 model;
uniform mat4 projection;
void main() {
    gl_Position = projection * model * vec4(pos, 1.0);
    uv = tex_coord;
}
";

const FS: &str = "#version 330 core
in vec2 uv;
out vec4 FragColor;
uniform sampler2D tex;
void main() {
    FragColor = texture(tex, uv);
}
";

#[rustfmt::skip]
const QUAD: [f32; 20] = [
     0.2,  0.2, 0.0,  1.0, 1.0,
     0.2, -0.2, 0.0,  1.0, 0.0,
    -0.2, -0.2, 0.0,  0.0, 0.0,
    -0.2,  0.2, 0.0,  0.0, 1.0,
];

const INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

fn corners() -> Vec<Vector3<f32>> {
    QUAD.chunks(5)
        .map(|v| Vector3::new(v[0], v[1], v[2]))
        .collect()
}

fn texture(device: &Device) -> Rc<Texture> {
    let data = TextureData {
        dimensions: Vector2::new(1, 1),
        bytes: vec![255; 4],
    };

    Rc::new(Texture::new(device, &TextureParams::default(), &data).unwrap())
}

#[test]
fn identity_keeps_corners() {
    let projection = Projection::ortho2d(-1.0f32, 1.0, -1.0, 1.0).to_matrix();
    for p in corners() {
        let v = clip_position(&projection, &Matrix4::identity(), p);
        assert_ulps_eq!(v, p.extend(1.0));
    }
}

#[test]
fn corners_follow_transform() {
    let projection = Projection::ortho2d(-3.0f32, 3.0, -3.0, 3.0).to_matrix();
    let offset = Vector3::new(-0.8, 0.8, 0.0);
    let transform = Matrix4::from_translation(offset);

    for p in corners() {
        let v = clip_position(&projection, &transform, p);
        let expected = (p + offset) / 3.0;
        assert_ulps_eq!(v, expected.extend(1.0));
    }

    // A half turn mirrors every corner through the origin.
    let transform = Matrix4::from_angle_z(Deg(180.0f32));
    for p in corners() {
        let v = clip_position(&projection, &transform, p);
        assert_relative_eq!(v, (-p / 3.0).extend(1.0), epsilon = 1e-6);
    }
}

#[test]
fn draw_in_order() {
    let device = Device::headless();
    let names = ["model", "projection"];
    let program = ShaderProgram::from_sources(&device, VS, FS, &names).unwrap();
    let model = program.uniform_location("model").unwrap();

    let quad = Rc::new(
        Geometry::new(&device, &VertexLayout::position_texcoord(), &QUAD, &INDICES).unwrap(),
    );

    let mut scene = Scene::new();
    assert!(scene.is_empty());
    assert_eq!(scene.next(SpriteIndex::default()), None);

    let offsets = [(-0.8, 0.8), (0.8, 0.8), (-0.8, -0.8), (0.8, -0.8)];
    let mut indices = Vec::new();
    for &(x, y) in &offsets {
        let transform = Matrix4::from_translation(Vector3::new(x, y, 0.0f32));
        let sprite = Sprite::new(quad.clone(), texture(&device), model).with_transform(transform);
        indices.push(scene.add(sprite));
    }

    assert_eq!(scene.len(), 4);
    assert_eq!(indices[2].index(), 2);
    assert_eq!(scene.next(indices[3]), Some(indices[0]));
    assert_eq!(device.info().alive_vertex_arrays, 1);
    assert_eq!(device.info().alive_textures, 4);

    program.use_program().unwrap();
    scene.draw(&program).unwrap();

    let info = device.info();
    assert_eq!(info.drawcall, 4);
    assert_eq!(info.triangles, 8);

    // The last sprite drawn leaves its transform behind.
    let last = scene.get(indices[3]).unwrap().transform();
    assert_eq!(
        device.uniform(program.id(), model),
        Some(UniformVariable::Matrix4(last.into()))
    );

    drop(scene);
    drop(quad);
    assert_eq!(device.info().alive_vertex_arrays, 0);
    assert_eq!(device.info().alive_textures, 0);
}

#[test]
fn rotate() {
    let device = Device::headless();
    let quad = Rc::new(
        Geometry::new(&device, &VertexLayout::position_texcoord(), &QUAD, &INDICES).unwrap(),
    );

    let location = UniformLocation::NOT_FOUND;
    let mut scene = Scene::new();
    let transform = Matrix4::from_translation(Vector3::new(1.0f32, 0.0, 0.0));
    let sprite = Sprite::new(quad, texture(&device), location).with_transform(transform);
    let index = scene.add(sprite);

    {
        let sprite = scene.get_mut(index).unwrap();
        sprite.rotate(Deg(45.0f32));
        sprite.rotate(Deg(45.0f32));
    }

    // Rotations happen about the sprite's own origin, after its translation.
    let m = scene.get(index).unwrap().transform();
    let v = m * Vector4::new(0.2f32, 0.0, 0.0, 1.0);
    assert_relative_eq!(v, Vector4::new(1.0, 0.2, 0.0, 1.0), epsilon = 1e-6);

    let centre = m * Vector4::new(0.0f32, 0.0, 0.0, 1.0);
    assert_relative_eq!(centre, Vector4::new(1.0, 0.0, 0.0, 1.0), epsilon = 1e-6);
}
