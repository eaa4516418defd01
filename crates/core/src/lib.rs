//! SettingsCraft Core
//!
//! Key-path addressing over a JSON document tree.
//!
//! A key path names a location inside a document, e.g. `"window.bounds.width"`.
//! Literal dots inside a segment are escaped as `\.`. Key paths may also be
//! given as (nested) lists that are flattened into the same dotted form.

mod accessor;
mod error;
mod keypath;

pub use accessor::{delete, get, get_mut, has, set, MAX_INDEX_GAP};
pub use error::*;
pub use keypath::{KeyPath, KeyPathSpec};
