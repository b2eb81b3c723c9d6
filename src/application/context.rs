use std::path::{Path, PathBuf};

use crate::math::prelude::Vector2;
use crate::video::{Device, VideoFrameInfo};

use super::settings::Settings;

/// The state shared between the render loop and the running `Application`.
pub struct Context {
    device: Device,
    settings: Settings,
    dimensions: Vector2<u32>,
    frame: u64,
    frame_info: VideoFrameInfo,
    shutdown: bool,
}

impl Context {
    pub fn new(device: Device, settings: Settings, dimensions: Vector2<u32>) -> Self {
        Context {
            device,
            settings,
            dimensions,
            frame: 0,
            frame_info: VideoFrameInfo::default(),
            shutdown: false,
        }
    }

    #[inline]
    pub fn device(&self) -> &Device {
        &self.device
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Resolves `path` against the assets directory.
    pub fn asset<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.settings.assets.join(path)
    }

    /// Returns the size in pixels of the framebuffer.
    #[inline]
    pub fn dimensions(&self) -> Vector2<u32> {
        self.dimensions
    }

    /// Returns width / height, or 1.0 for a collapsed framebuffer.
    pub fn aspect(&self) -> f32 {
        if self.dimensions.y == 0 {
            1.0
        } else {
            self.dimensions.x as f32 / self.dimensions.y as f32
        }
    }

    /// The number of frames rendered so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// The video counters of the last rendered frame.
    #[inline]
    pub fn frame_info(&self) -> VideoFrameInfo {
        self.frame_info
    }

    /// Shutdown the whole application at the end of this frame.
    #[inline]
    pub fn shutdown(&mut self) {
        self.shutdown = true;
    }

    /// Returns true if we are going to shutdown the application at the end of this frame.
    #[inline]
    pub fn is_shutdown(&self) -> bool {
        self.shutdown
    }

    pub(crate) fn set_dimensions(&mut self, dimensions: Vector2<u32>) {
        self.dimensions = dimensions;
    }

    pub(crate) fn end_frame(&mut self, info: VideoFrameInfo) {
        self.frame_info = info;
        self.frame += 1;
    }
}
