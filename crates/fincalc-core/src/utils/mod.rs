//! Shared numeric helpers: form-input parsing, display formatting,
//! rounding and rate conversion, and input validation.

pub mod format;
pub mod parse;
pub mod rounding;
pub mod validation;
