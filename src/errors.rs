use std::fmt;
use std::io;
use std::path::PathBuf;

use glutin;
use image;
use serde_json;

/// The programmable stage a piece of shader source belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

#[derive(Debug, Fail)]
pub enum Error {
    FileNotFound(PathBuf),
    Io(String),
    Compile { stage: ShaderStage, log: String },
    Link(String),
    UnknownUniform(String),
    ImageLoad(String),
    InvalidGeometry(String),
    InvalidProjection(String),
    Window(String),
    Backend(String),
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::FileNotFound(ref v) => write!(f, "Shader source not found: '{}'.", v.display()),
            Error::Io(ref v) => write!(f, "IO: {}", v),
            Error::Compile { ref stage, ref log } => {
                write!(f, "Failed to compile {} shader, errors: \n{}", stage, log)
            }
            Error::Link(ref v) => write!(f, "Failed to link shader program, errors: \n{}", v),
            Error::UnknownUniform(ref v) => {
                write!(f, "Uniform '{}' was never registered with this program.", v)
            }
            Error::ImageLoad(ref v) => write!(f, "Failed to load image: {}", v),
            Error::InvalidGeometry(ref v) => write!(f, "Invalid geometry: {}", v),
            Error::InvalidProjection(ref v) => write!(f, "Invalid projection: {}", v),
            Error::Window(ref v) => write!(f, "Window: {}", v),
            Error::Backend(ref v) => write!(f, "Backend: {}", v),
            Error::Config(ref v) => write!(f, "Config: {}", v),
        }
    }
}

pub type Result<T> = ::std::result::Result<T, Error>;

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(format!("{}", err))
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Error {
        Error::ImageLoad(format!("{}", err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::Config(format!("{}", err))
    }
}

impl From<glutin::CreationError> for Error {
    fn from(err: glutin::CreationError) -> Error {
        Error::Window(format!("{}", err))
    }
}

impl From<glutin::ContextError> for Error {
    fn from(err: glutin::ContextError) -> Error {
        Error::Window(format!("{}", err))
    }
}
