//! Functions for loading application settings.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{self, Value};

use crate::errors::*;
use crate::math::prelude::Color;
use crate::window::WindowParams;

/// A structure containing configuration data for the exercises, which are
/// used to specify hardware setup stuff to create the window and other
/// context information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowParams,
    /// The directory that shader and texture paths are relative to.
    pub assets: PathBuf,
    /// Runs without a window or a GL context.
    pub headless: bool,
    /// How many empty frames a headless run lasts before it closes itself.
    pub headless_frames: usize,
    /// The color the framebuffer is cleared to every frame.
    pub clear_color: Color<f32>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            window: WindowParams::default(),
            assets: PathBuf::from("assets"),
            headless: false,
            headless_frames: 60,
            clear_color: Color::new(0.2, 0.3, 0.3, 1.0),
        }
    }
}

impl Settings {
    /// Loads settings from a JSON file. Fields missing from the file keep
    /// their default values.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::default().overlay_file(path)
    }

    /// Overrides the fields present in the JSON file at `path`, keeping the
    /// others as they are.
    pub fn overlay_file<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        let path = path.as_ref();
        let buf = fs::read_to_string(path)
            .map_err(|err| Error::Config(format!("Failed to read {:?}. {}", path, err)))?;

        let settings = self.overlay_str(&buf)?;
        info!("Loads settings from {:?}.", path);
        Ok(settings)
    }

    /// Overrides the fields present in the JSON object `json`.
    pub fn overlay_str(self, json: &str) -> Result<Self> {
        let overlay: Value = serde_json::from_str(json)?;
        if !overlay.is_object() {
            return Err(Error::Config("Settings must be a JSON object.".into()));
        }

        let mut base = serde_json::to_value(&self)?;
        merge(&mut base, overlay);
        Ok(serde_json::from_value(base)?)
    }

    /// Applies the command line of an exercise on top of `self`.
    ///
    /// `--headless` turns the headless mode on; any other argument is taken as
    /// the path of a JSON settings file.
    pub fn with_args<I>(self, args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut settings = self;
        let mut headless = false;

        for v in args {
            if v == "--headless" {
                headless = true;
            } else {
                settings = settings.overlay_file(&v)?;
            }
        }

        settings.headless |= headless;
        Ok(settings)
    }

    /// Shortcut of `with_args` with the arguments of this process.
    pub fn parse_args(self) -> Result<Self> {
        self.with_args(::std::env::args().skip(1))
    }
}

fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (&mut Value::Object(ref mut base), Value::Object(overlay)) => {
            for (k, v) in overlay {
                match base.get_mut(&k) {
                    Some(field) => merge(field, v),
                    None => {
                        base.insert(k, v);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::prelude::Vector2;

    #[test]
    fn overlay() {
        let mut defaults = Settings::default();
        defaults.window.title = "quads".into();

        let settings = defaults
            .overlay_str(r#"{ "window": { "size": { "x": 1024, "y": 768 } }, "headless": true }"#)
            .unwrap();

        assert_eq!(settings.window.title, "quads");
        assert_eq!(settings.window.size, Vector2::new(1024, 768));
        assert_eq!(settings.window.gl_version, (3, 3));
        assert!(settings.headless);
    }

    #[test]
    fn args() {
        let settings = Settings::default()
            .with_args(vec!["--headless".to_owned()])
            .unwrap();
        assert!(settings.headless);

        match Settings::default().with_args(vec!["/nonexistent/settings.json".to_owned()]) {
            Err(Error::Config(_)) => {}
            v => panic!("unexpected result {:?}", v),
        }
    }

    #[test]
    fn malformed() {
        assert!(Settings::default().overlay_str("[1, 2]").is_err());
        assert!(Settings::default().overlay_str("{ \"headless\": 3 }").is_err());
        assert!(Settings::default().overlay_str("{ oops").is_err());
    }
}
