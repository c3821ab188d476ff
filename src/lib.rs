//! # Schemable
//!
//! Schema-driven decoders, guards and encoders with accumulating,
//! path-addressed errors.
//!
//! ## Overview
//!
//! A decoder turns untyped input (a `serde_json::Value`) into a typed value
//! or a tree describing every way the input was wrong. Sibling checks never
//! stop at the first failure: a struct with three bad fields reports all
//! three, each under the property it belongs to. Failures accumulate in a
//! [`FreeSemigroup`] carried by stillwater's `Validation` type.
//!
//! The same shape can be described once, as a [`Schema`], and interpreted
//! as a [`Decoder`], a [`Guard`] or an [`Encoder`].
//!
//! ## Core Types
//!
//! - [`Decoder`]: validates and converts input, accumulating failures
//! - [`DecodeError`]: one node of a failure tree (leaf, property, index,
//!   union member, recursive definition, or context message)
//! - [`Guard`]: a boolean membership test that agrees with the decoder
//! - [`Encoder`] / [`Codec`]: the total reverse direction
//! - [`Schemable`]: the interpreter interface a [`Schema`] is written against
//! - [`Registry`]: named lazy definitions for recursive shapes
//!
//! ## Example
//!
//! ```rust
//! use schemable::{decoder, draw::draw};
//! use serde_json::json;
//!
//! let user = decoder::struct_(vec![
//!     ("name", decoder::string().into_value()),
//!     ("age", decoder::number().into_value()),
//! ]);
//!
//! assert!(user.decode(&json!({"name": "Ada", "age": 36})).is_success());
//!
//! let errors = user.decode(&json!({"age": "old"})).into_result().unwrap_err();
//! assert_eq!(
//!     draw(&errors),
//!     [
//!         "required property \"name\"",
//!         "└─ cannot decode null, should be string",
//!         "required property \"age\"",
//!         "└─ cannot decode \"old\", should be number",
//!     ]
//!     .join("\n")
//! );
//! ```

pub mod codec;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod free_semigroup;
pub mod guard;
pub mod path;
pub mod registry;
pub mod schemable;
pub mod validation;

pub use error::draw;

pub use codec::Codec;
pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{DecodeError, DecodeErrorFold, DecodeErrors, DecodeFailure, Requiredness};
pub use free_semigroup::FreeSemigroup;
pub use guard::Guard;
pub use path::{failures, ErrorPath, LeafFailure, PathSegment};
pub use registry::{Definition, Registry};
pub use schemable::{
    DecoderInterpreter, EncoderInterpreter, GuardInterpreter, Schema, SchemaKey, Schemable,
    WithRefine, WithUnion, WithUnknownContainers,
};
pub use validation::Decoded;
