//! Commonly used utilities.

pub mod hash;

pub mod prelude {
    pub use super::hash::{FastHashMap, FastHashSet};
}
