//! Interpreter dispatch: write a shape once, get a decoder, a guard and an
//! encoder from it.
//!
//! A [`Schema`] is written against [`Schemable`] (plus any capability traits
//! it needs). [`DecoderInterpreter`], [`GuardInterpreter`] and
//! [`EncoderInterpreter`] each turn it into their own representation, and
//! [`Schemable::make`] remembers the result per schema.
//!
//! Recursive shapes go through [`Schemable::lazy`]; the definition is
//! registered in the interpreter's registry and built on first use.
//!
//! # Example
//!
//! ```rust
//! use schemable::{DecoderInterpreter, GuardInterpreter, Schema, Schemable, draw::draw};
//! use serde_json::json;
//!
//! struct Category;
//!
//! impl<S: Schemable> Schema<S> for Category {
//!     fn interpret(&self, s: &S) -> S::Repr {
//!         s.lazy("Category", |s: &S| {
//!             s.struct_(vec![
//!                 ("name", s.string()),
//!                 ("subcategories", s.array(s.make(&Category))),
//!             ])
//!         })
//!     }
//! }
//!
//! let decoder = DecoderInterpreter::new().make(&Category);
//! let input = json!({"name": "a", "subcategories": [{"name": "b", "subcategories": []}]});
//! assert!(decoder.decode(&input).is_success());
//! assert!(GuardInterpreter::new().make(&Category).is(&input));
//!
//! let errors = decoder
//!     .decode(&json!({"name": "a", "subcategories": [{"name": 1, "subcategories": []}]}))
//!     .into_result()
//!     .unwrap_err();
//! assert_eq!(
//!     draw(&errors),
//!     [
//!         "lazy type Category",
//!         "└─ required property \"subcategories\"",
//!         "   └─ optional index 0",
//!         "      └─ lazy type Category",
//!         "         └─ required property \"name\"",
//!         "            └─ cannot decode 1, should be string",
//!     ]
//!     .join("\n")
//! );
//! ```

mod compiled;
mod interpreters;
mod traits;

pub use compiled::{Compiled, SchemaKey};
pub use interpreters::{DecoderInterpreter, EncoderInterpreter, GuardInterpreter};
pub use traits::{Schema, Schemable, WithRefine, WithUnion, WithUnknownContainers};
