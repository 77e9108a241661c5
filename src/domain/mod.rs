//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - mode weight vectors (`Mode`) and frequency inputs (`IntoFrequencies`)
//! - the frequency-append policy (`ModeExtension`)
//! - the serialized model form (`ModelSnapshot`)

pub mod types;

pub use types::*;
