//! Codecs: a decoder and an encoder for the same type, kept together.
//!
//! A [`Codec<I, O, A>`] decodes `I` into `A` and encodes `A` into `O`. The
//! JSON-level constructors in this module pair each decoder combinator with
//! its encoder counterpart, so `decode(encode(a))` gives back `a` for any
//! value the codec produced.
//!
//! # Example
//!
//! ```rust
//! use schemable::codec;
//! use serde_json::{json, Value};
//!
//! let point = codec::struct_(vec![
//!     ("x", codec::number().imap(Value::from, |v: &Value| v.as_f64().unwrap_or_default())),
//!     ("y", codec::number().imap(Value::from, |v: &Value| v.as_f64().unwrap_or_default())),
//! ]);
//!
//! let decoded = point.decode(&json!({"x": 1, "y": 2})).into_result().unwrap();
//! assert_eq!(point.encode(&decoded), json!({"x": 1.0, "y": 2.0}));
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::decoder::{self, Decoder};
use crate::encoder::{self, Encoder};
use crate::error::{DecodeError, DecodeErrors};
use crate::free_semigroup::FreeSemigroup;
use crate::registry::Registry;
use crate::validation::{map_errors, Decoded};

/// A paired decoder and encoder.
pub struct Codec<I, O, A> {
    decoder: Decoder<I, A>,
    encoder: Encoder<O, A>,
}

impl<I, O, A> Clone for Codec<I, O, A> {
    fn clone(&self) -> Self {
        Self {
            decoder: self.decoder.clone(),
            encoder: self.encoder.clone(),
        }
    }
}

impl<I, O, A> fmt::Debug for Codec<I, O, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec").finish_non_exhaustive()
    }
}

impl<I: 'static, O: 'static, A: 'static> Codec<I, O, A> {
    /// Pairs a decoder with an encoder.
    pub fn make(decoder: Decoder<I, A>, encoder: Encoder<O, A>) -> Self {
        Self { decoder, encoder }
    }

    /// Returns the decoding half.
    pub fn decoder(&self) -> &Decoder<I, A> {
        &self.decoder
    }

    /// Returns the encoding half.
    pub fn encoder(&self) -> &Encoder<O, A> {
        &self.encoder
    }

    /// Splits the codec into its halves.
    pub fn into_parts(self) -> (Decoder<I, A>, Encoder<O, A>) {
        (self.decoder, self.encoder)
    }

    /// Runs the decoder.
    pub fn decode(&self, input: &I) -> Decoded<A> {
        self.decoder.decode(input)
    }

    /// Runs the encoder.
    pub fn encode(&self, value: &A) -> O {
        self.encoder.encode(value)
    }

    /// Changes the decoded type with a pair of conversions.
    pub fn imap<B: 'static>(
        self,
        f: impl Fn(A) -> B + Send + Sync + 'static,
        g: impl Fn(&B) -> A + Send + Sync + 'static,
    ) -> Codec<I, O, B> {
        Codec::make(self.decoder.map(f), self.encoder.contramap(g))
    }

    /// Decodes further with `next`; encodes with `next` first, then `self`.
    pub fn compose<B: 'static>(self, next: Codec<A, A, B>) -> Codec<I, O, B> {
        Codec::make(
            self.decoder.compose(next.decoder),
            next.encoder.compose(self.encoder),
        )
    }

    /// Refines the decoder; the encoder is unchanged.
    pub fn refine(
        self,
        predicate: impl Fn(&A) -> bool + Send + Sync + 'static,
        id: impl Into<String>,
    ) -> Self
    where
        A: Serialize,
    {
        Codec::make(self.decoder.refine(predicate, id), self.encoder)
    }

    /// See [`Decoder::with_message`].
    pub fn with_message(
        self,
        message: impl Fn(&I, &DecodeErrors) -> String + Send + Sync + 'static,
    ) -> Self {
        Codec::make(self.decoder.with_message(message), self.encoder)
    }

    /// See [`Decoder::map_left_with_input`].
    pub fn map_left_with_input(
        self,
        f: impl Fn(&I, DecodeErrors) -> DecodeErrors + Send + Sync + 'static,
    ) -> Self {
        Codec::make(self.decoder.map_left_with_input(f), self.encoder)
    }
}

impl<I: 'static, A: Clone + 'static> Codec<I, A, A> {
    /// Builds a codec whose encoder returns the value unchanged.
    ///
    /// # Example
    ///
    /// ```rust
    /// use schemable::{decoder, Codec};
    /// use serde_json::json;
    ///
    /// let status = Codec::from_decoder(decoder::literal(["active", "disabled"]));
    ///
    /// let decoded = status.decode(&json!("active")).into_result().unwrap();
    /// assert_eq!(status.encode(&decoded), json!("active"));
    /// ```
    pub fn from_decoder(decoder: Decoder<I, A>) -> Self {
        Codec::make(decoder, encoder::id())
    }
}

/// Type alias for codecs over JSON on both sides.
pub type JsonCodec<A> = Codec<Value, Value, A>;

/// JSON strings.
pub fn string() -> JsonCodec<String> {
    Codec::make(decoder::string(), encoder::to_value())
}

/// JSON numbers.
pub fn number() -> JsonCodec<f64> {
    Codec::make(decoder::number(), encoder::to_value())
}

/// JSON booleans.
pub fn boolean() -> JsonCodec<bool> {
    Codec::make(decoder::boolean(), encoder::to_value())
}

/// One of the given values.
pub fn literal<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> JsonCodec<Value> {
    Codec::from_decoder(decoder::literal(values))
}

/// Any JSON array.
pub fn unknown_array() -> JsonCodec<Vec<Value>> {
    Codec::make(decoder::unknown_array(), encoder::to_value())
}

/// Any JSON object.
pub fn unknown_record() -> JsonCodec<Map<String, Value>> {
    Codec::make(decoder::unknown_record(), encoder::to_value())
}

/// `null` or whatever `or` handles.
pub fn nullable<A: 'static>(or: JsonCodec<A>) -> JsonCodec<Option<A>> {
    let (d, e) = or.into_parts();
    Codec::make(decoder::nullable(d), encoder::nullable(e))
}

type Split = (Vec<(String, Decoder<Value, Value>)>, Vec<(String, Encoder<Value, Value>)>);

fn split<K: Into<String>>(props: impl IntoIterator<Item = (K, JsonCodec<Value>)>) -> Split {
    props
        .into_iter()
        .map(|(k, c)| {
            let k = k.into();
            let (d, e) = c.into_parts();
            ((k.clone(), d), (k, e))
        })
        .unzip()
}

/// An object with required properties.
pub fn struct_<K: Into<String>>(
    props: impl IntoIterator<Item = (K, JsonCodec<Value>)>,
) -> JsonCodec<Map<String, Value>> {
    let (decoders, encoders) = split(props);
    Codec::make(decoder::struct_(decoders), encoder::struct_(encoders))
}

/// An object whose properties may all be absent.
///
/// A property present as `null` is decoded as `null` without running its
/// codec, so it is accepted whatever the property's shape.
pub fn partial<K: Into<String>>(
    props: impl IntoIterator<Item = (K, JsonCodec<Value>)>,
) -> JsonCodec<Map<String, Value>> {
    let (decoders, encoders) = split(props);
    Codec::make(decoder::partial(decoders), encoder::partial(encoders))
}

/// An object whose every value matches `codomain`.
pub fn record<A: 'static>(codomain: JsonCodec<A>) -> JsonCodec<IndexMap<String, A>> {
    let (d, e) = codomain.into_parts();
    Codec::make(decoder::record(d), encoder::record(e))
}

/// An array whose every element matches `item`.
pub fn array<A: 'static>(item: JsonCodec<A>) -> JsonCodec<Vec<A>> {
    let (d, e) = item.into_parts();
    Codec::make(decoder::array(d), encoder::array(e))
}

/// A fixed-length array.
pub fn tuple<A: 'static>(components: Vec<JsonCodec<A>>) -> JsonCodec<Vec<A>> {
    let (decoders, encoders): (Vec<_>, Vec<_>) =
        components.into_iter().map(Codec::into_parts).unzip();
    Codec::make(decoder::tuple(decoders), encoder::tuple(encoders))
}

/// Both codecs at once; results are merged right over left.
pub fn intersect(left: JsonCodec<Value>, right: JsonCodec<Value>) -> JsonCodec<Value> {
    let (ld, le) = left.into_parts();
    let (rd, re) = right.into_parts();
    Codec::make(decoder::intersect(ld, rd), encoder::intersect(le, re))
}

/// A tagged union dispatched on the `tag` property.
pub fn sum<K: Into<String>>(
    tag: impl Into<String>,
    members: impl IntoIterator<Item = (K, JsonCodec<Value>)>,
) -> JsonCodec<Value> {
    let tag = tag.into();
    let (decoders, encoders) = split(members);
    Codec::make(
        decoder::sum(tag.as_str(), decoders),
        encoder::sum(tag, encoders),
    )
}

/// A recursive codec resolved through `registry`.
///
/// Both halves share one definition, so the thunk runs at most once.
/// Decode failures are wrapped in [`DecodeError::Lazy`] as
/// [`decoder::lazy`] does.
pub fn lazy<I: 'static, O: 'static, A: 'static>(
    registry: &Registry<Codec<I, O, A>>,
    id: impl Into<String>,
    thunk: impl Fn() -> Codec<I, O, A> + Send + Sync + 'static,
) -> Codec<I, O, A> {
    let definition = registry.define(id, thunk);
    let for_encode = Arc::clone(&definition);
    Codec::make(
        Decoder::new(move |input: &I| {
            map_errors(definition.force().decode(input), |e| {
                FreeSemigroup::of(DecodeError::lazy(definition.id(), e))
            })
        }),
        Encoder::new(move |a: &A| for_encode.force().encode(a)),
    )
}
