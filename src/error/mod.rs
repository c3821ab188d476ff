//! Error types for decode failures.
//!
//! This module provides the [`DecodeError`] tree, its requiredness marker,
//! the [`DecodeFailure`] standard error, and the [`draw`] renderer.

mod decode_error;
pub mod draw;

pub use decode_error::{DecodeError, DecodeErrorFold, DecodeErrors, DecodeFailure, Requiredness};
