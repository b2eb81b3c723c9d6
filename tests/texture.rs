extern crate glsteps;

use std::path::{Path, PathBuf};

use glsteps::errors::*;
use glsteps::math::prelude::*;
use glsteps::video::prelude::*;

fn asset(path: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets").join(path)
}

#[test]
fn decode() {
    let data = TextureData::from_path(asset("textures/1.png"), false).unwrap();
    assert_eq!(data.dimensions, Vector2::new(32, 32));
    assert_eq!(data.bytes.len(), 32 * 32 * 4);

    // The border is white and opaque.
    assert_eq!(&data.bytes[0..4], &[255, 255, 255, 255]);
}

#[test]
fn flip() {
    let top_down = TextureData::from_path(asset("textures/2.png"), false).unwrap();
    let bottom_up = TextureData::from_path(asset("textures/2.png"), true).unwrap();

    let row = 32 * 4;
    let rows = |data: &TextureData, i: usize| data.bytes[i * row..(i + 1) * row].to_vec();

    for i in 0..32 {
        assert_eq!(rows(&top_down, i), rows(&bottom_up, 31 - i));
    }
}

#[test]
fn upload() {
    let device = Device::headless();
    let params = TextureParams::default();

    let texture = Texture::from_file(&device, asset("textures/texquad.png"), &params).unwrap();
    assert_eq!(texture.dimensions(), Vector2::new(64, 64));
    assert_eq!(device.info().alive_textures, 1);

    texture.bind(0).unwrap();
    texture.del().unwrap();
    assert_eq!(device.info().alive_textures, 0);
}

#[test]
fn missing() {
    let device = Device::headless();
    let params = TextureParams::default();

    match Texture::from_file(&device, asset("textures/missing.png"), &params) {
        Err(Error::ImageLoad(_)) => {}
        Err(err) => panic!("unexpected error {}", err),
        Ok(_) => panic!("loaded a missing image"),
    }

    assert_eq!(device.info().alive_textures, 0);
}
