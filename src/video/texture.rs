//! Immutable 2D textures decoded from image files.

use std::path::Path;

use image::{self, DynamicImage};

use crate::errors::*;
use crate::math::prelude::Vector2;

use super::{Device, TextureId};

/// The parameters of a texture object.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureParams {
    /// Sets the wrap parameter for texture.
    pub wrap: TextureWrap,
    /// Specify how the texture is used whenever the pixel being sampled.
    pub filter: TextureFilter,
    /// Should we generates a complete set of mipmaps for a texture object.
    pub mipmaps: bool,
    /// Flips decoded images so that their first row ends up at the bottom,
    /// where OpenGL expects it.
    pub flip_vertically: bool,
}

impl Default for TextureParams {
    fn default() -> Self {
        TextureParams {
            wrap: TextureWrap::Repeat,
            filter: TextureFilter::Linear,
            mipmaps: true,
            flip_vertically: true,
        }
    }
}

/// Wrap mode of texture coordinates outside [0, 1].
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum TextureWrap {
    Repeat,
    Clamp,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum TextureFilter {
    Nearest,
    Linear,
}

/// Tightly packed RGBA8 pixels, first row first.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub dimensions: Vector2<u32>,
    pub bytes: Vec<u8>,
}

impl TextureData {
    /// Decodes the image file at `path`.
    pub fn from_path<P: AsRef<Path>>(path: P, flip_vertically: bool) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|err| Error::ImageLoad(format!("{:?}: {}", path, err)))?;

        Ok(Self::from_image(img, flip_vertically))
    }

    /// Decodes an encoded image held in memory.
    pub fn from_memory(bytes: &[u8], flip_vertically: bool) -> Result<Self> {
        let img = image::load_from_memory(bytes)?;
        Ok(Self::from_image(img, flip_vertically))
    }

    fn from_image(img: DynamicImage, flip_vertically: bool) -> Self {
        let img = if flip_vertically { img.flipv() } else { img };
        let rgba = img.to_rgba();
        let (w, h) = rgba.dimensions();

        TextureData {
            dimensions: Vector2::new(w, h),
            bytes: rgba.into_raw(),
        }
    }
}

/// A texture object in GPU memory.
pub struct Texture {
    device: Device,
    id: TextureId,
    dimensions: Vector2<u32>,
    released: bool,
}

impl Texture {
    /// Uploads `data` into a new texture.
    pub fn new(device: &Device, params: &TextureParams, data: &TextureData) -> Result<Self> {
        let len = data.dimensions.x as usize * data.dimensions.y as usize * 4;
        if data.bytes.len() != len {
            return Err(Error::ImageLoad(format!(
                "{}x{} RGBA8 pixels take {} bytes, found {}.",
                data.dimensions.x,
                data.dimensions.y,
                len,
                data.bytes.len()
            )));
        }

        let id = unsafe { device.visitor().create_texture(params, data)? };
        Ok(Texture {
            device: device.clone(),
            id,
            dimensions: data.dimensions,
            released: false,
        })
    }

    /// Decodes the image at `path` and uploads it.
    pub fn from_file<P: AsRef<Path>>(
        device: &Device,
        path: P,
        params: &TextureParams,
    ) -> Result<Self> {
        let data = TextureData::from_path(path.as_ref(), params.flip_vertically)?;
        let texture = Self::new(device, params, &data)?;

        info!(
            "Loads texture {:?} ({}x{}).",
            path.as_ref(),
            data.dimensions.x,
            data.dimensions.y
        );

        Ok(texture)
    }

    #[inline]
    pub fn id(&self) -> TextureId {
        self.id
    }

    #[inline]
    pub fn dimensions(&self) -> Vector2<u32> {
        self.dimensions
    }

    /// Binds this texture to texture unit `unit`.
    pub fn bind(&self, unit: u32) -> Result<()> {
        unsafe { self.device.visitor().bind_texture(unit, self.id) }
    }

    /// Releases the texture now.
    pub fn del(mut self) -> Result<()> {
        self.release()
    }

    fn release(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }

        self.released = true;
        unsafe { self.device.visitor().delete_texture(self.id) }
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            warn!("Failed to release texture {}. {}", self.id, err);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use image::png::PNGEncoder;
    use image::{ColorType, Rgba, RgbaImage};

    fn encode(img: RgbaImage) -> Vec<u8> {
        let mut buf = Vec::new();
        let (w, h) = img.dimensions();
        PNGEncoder::new(&mut buf)
            .encode(&img.into_raw(), w, h, ColorType::RGBA(8))
            .unwrap();
        buf
    }

    #[test]
    fn flip() {
        let mut img = RgbaImage::new(1, 2);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(0, 1, Rgba([0, 0, 255, 255]));
        let buf = encode(img);

        let data = TextureData::from_memory(&buf, false).unwrap();
        assert_eq!(data.dimensions, Vector2::new(1, 2));
        assert_eq!(&data.bytes[0..4], &[255, 0, 0, 255]);

        let data = TextureData::from_memory(&buf, true).unwrap();
        assert_eq!(&data.bytes[0..4], &[0, 0, 255, 255]);
    }

    #[test]
    fn garbage() {
        match TextureData::from_memory(b"not an image", true) {
            Err(Error::ImageLoad(_)) => {}
            v => panic!("unexpected result {:?}", v),
        }
    }

    #[test]
    fn size_mismatch() {
        let device = Device::headless();
        let data = TextureData {
            dimensions: Vector2::new(2, 2),
            bytes: vec![0; 4],
        };

        assert!(Texture::new(&device, &TextureParams::default(), &data).is_err());
        assert_eq!(device.info().alive_textures, 0);
    }
}
