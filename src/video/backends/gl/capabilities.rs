use std::cmp;
use std::ffi;

use gl;
use gl::types::*;

use crate::errors::*;

/// Describes a version.
///
/// A version can only be compared to another version if they belong to the same API.
/// For example, both `Version::GL(3, 0) >= Version::ES(3, 0)` and `Version::ES(3, 0) >=
/// Version::GL(3, 0)` return `false`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Version {
    /// Regular OpenGL.
    GL(u8, u8),
    /// OpenGL embedded system.
    ES(u8, u8),
}

impl PartialOrd for Version {
    #[inline]
    fn partial_cmp(&self, other: &Version) -> Option<cmp::Ordering> {
        let (es1, major1, minor1) = match *self {
            Version::GL(major, minor) => (false, major, minor),
            Version::ES(major, minor) => (true, major, minor),
        };

        let (es2, major2, minor2) = match *other {
            Version::GL(major, minor) => (false, major, minor),
            Version::ES(major, minor) => (true, major, minor),
        };

        if es1 != es2 {
            None
        } else {
            match major1.cmp(&major2) {
                cmp::Ordering::Equal => Some(minor1.cmp(&minor2)),
                v => Some(v),
            }
        }
    }
}

impl Version {
    /// Parses the string returned by `glGetString(GL_VERSION)`.
    pub fn parse(source: &str) -> Result<Version> {
        let (es, desc) = if let Some(rest) = source.strip_prefix("OpenGL ES-") {
            // A profile name such as "CM" precedes the version number.
            (true, rest.splitn(2, ' ').nth(1).unwrap_or(""))
        } else if let Some(rest) = source.strip_prefix("OpenGL ES ") {
            (true, rest)
        } else {
            (false, source)
        };

        let malformed = || Error::Backend(format!("[GL] Version string {:?} is malformed.", source));
        let desc = desc.split(' ').next().ok_or_else(malformed)?;

        let mut iter = desc.split('.');
        let major = iter
            .next()
            .and_then(|v| v.parse().ok())
            .ok_or_else(malformed)?;
        let minor = iter
            .next()
            .and_then(|v| v.parse().ok())
            .ok_or_else(malformed)?;

        if es {
            Ok(Version::ES(major, minor))
        } else {
            Ok(Version::GL(major, minor))
        }
    }

    /// Returns true if this is at least OpenGL 3.3 or OpenGL ES 3.0.
    pub fn is_supported(self) -> bool {
        match self {
            Version::GL(..) => self >= Version::GL(3, 3),
            Version::ES(..) => self >= Version::ES(3, 0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Capabilities {
    pub version: Version,
    pub vendor: String,
    pub renderer: String,
}

impl Capabilities {
    /// Queries the capabilities of the current context.
    ///
    /// # Unsafe
    ///
    /// You must ensure that the functions belong to the current context, otherwise you will get
    /// an undefined behavior.
    pub unsafe fn parse() -> Result<Capabilities> {
        let version = Version::parse(&get_string(gl::VERSION)?)?;
        let vendor = get_string(gl::VENDOR)?;
        let renderer = get_string(gl::RENDERER)?;

        Ok(Capabilities {
            version,
            vendor,
            renderer,
        })
    }
}

unsafe fn get_string(name: GLenum) -> Result<String> {
    let ptr = gl::GetString(name);
    if ptr.is_null() {
        return Err(Error::Backend(format!(
            "[GL] glGetString({:#x}) returned nothing.",
            name
        )));
    }

    let bytes = ffi::CStr::from_ptr(ptr as *const _).to_bytes();
    Ok(String::from_utf8_lossy(bytes).into_owned())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse() {
        assert_eq!(
            Version::parse("3.3.0 NVIDIA 390.77").unwrap(),
            Version::GL(3, 3)
        );
        assert_eq!(
            Version::parse("4.6 (Core Profile) Mesa 21.2.6").unwrap(),
            Version::GL(4, 6)
        );
        assert_eq!(
            Version::parse("OpenGL ES 3.0 Mesa 20.0").unwrap(),
            Version::ES(3, 0)
        );
        assert_eq!(
            Version::parse("OpenGL ES-CM 1.1").unwrap(),
            Version::ES(1, 1)
        );
        assert!(Version::parse("garbage").is_err());
        assert!(Version::parse("OpenGL ES-CM").is_err());
        assert!(Version::parse("OpenGL ES-").is_err());
    }

    #[test]
    fn supported() {
        assert!(Version::GL(3, 3).is_supported());
        assert!(Version::GL(4, 6).is_supported());
        assert!(Version::ES(3, 0).is_supported());
        assert!(!Version::GL(2, 1).is_supported());
        assert!(!Version::GL(3, 2).is_supported());
        assert!(!Version::ES(2, 0).is_supported());
    }

    #[test]
    fn compare() {
        assert!(Version::GL(3, 3) >= Version::GL(3, 0));
        assert!(Version::GL(2, 1) < Version::GL(3, 0));
        assert!(!(Version::GL(3, 0) >= Version::ES(3, 0)));
    }
}
