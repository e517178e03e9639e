//! Direct ECMA-335 metadata introspection for on-disk modules.
//!
//! The module file is walked as a plain PE image; the embedded metadata
//! (heaps and tables) is parsed into an [`Image`] that answers the
//! queries the report needs. No runtime is involved.

pub mod crypto;
pub mod cursor;
pub mod error;
pub mod heaps;
pub mod image;
pub mod pe;
pub mod sig;
pub mod tables;

pub use error::{Error, Result};
pub use image::{FieldInfo, Image, MethodInfo, PropertyInfo};
