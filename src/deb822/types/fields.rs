//! Field descriptors and schema construction for deb822 record types.
//!
//! A record type declares, once, how each of its attributes maps onto a
//! textual key: which key identifies it, how raw text decodes into the typed
//! attribute, how the attribute encodes back into text, and what happens when
//! the key is absent from a stanza. The declarations are collected into an
//! immutable [`Schema`] that both the reader and the writer consult.
//!
//! Decode strategy resolution happens here, at schema-build time, not per
//! line:
//! 1. A decode closure supplied through [`FieldBuilder::decode_with`] or
//!    [`FieldBuilder::custom`].
//! 2. Otherwise, the value type's own [`FieldValue::parse_text`]. Plain
//!    `String` fields pass text through unchanged; a type with neither a
//!    `FieldValue` impl nor a custom decode closure is rejected by the
//!    compiler.

use std::collections::HashMap;

use super::error::{Deb822Error, Result};

/// Out-of-band `Meta-*` fields collected per stanza, keys lower-cased.
pub type MetaMap = HashMap<String, String>;

/// Conversion between a field's typed value and its textual form.
///
/// `parse_text` is the fallback decoder used when a field declares no decode
/// closure of its own. `to_text` is the fallback encoder; returning `None`
/// marks the value as unrepresentable in the format (empty, zero, absent),
/// which makes the writer omit the field entirely.
pub trait FieldValue: Sized {
    /// Parses the accumulated raw text of one field.
    fn parse_text(text: &str) -> std::result::Result<Self, String>;

    /// Renders the value, or `None` if the field should be omitted on write.
    fn to_text(&self) -> Option<String>;
}

impl FieldValue for String {
    fn parse_text(text: &str) -> std::result::Result<Self, String> {
        Ok(text.to_string())
    }

    fn to_text(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self.clone())
        }
    }
}

impl FieldValue for Option<String> {
    fn parse_text(text: &str) -> std::result::Result<Self, String> {
        Ok(Some(text.to_string()))
    }

    fn to_text(&self) -> Option<String> {
        self.as_ref().filter(|s| !s.is_empty()).cloned()
    }
}

macro_rules! impl_field_value_int {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                fn parse_text(text: &str) -> std::result::Result<Self, String> {
                    text.trim()
                        .parse()
                        .map_err(|e| format!("invalid integer {:?}: {}", text, e))
                }

                fn to_text(&self) -> Option<String> {
                    if *self == 0 {
                        None
                    } else {
                        Some(self.to_string())
                    }
                }
            }
        )*
    };
}

impl_field_value_int!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl FieldValue for bool {
    fn parse_text(text: &str) -> std::result::Result<Self, String> {
        match text.trim() {
            "yes" | "true" => Ok(true),
            "no" | "false" => Ok(false),
            other => Err(format!("invalid boolean {:?}", other)),
        }
    }

    fn to_text(&self) -> Option<String> {
        if *self {
            Some("yes".to_string())
        } else {
            None
        }
    }
}

type DecodeFn<R> = Box<dyn Fn(&mut R, &str) -> std::result::Result<(), String> + Send + Sync>;
type EncodeFn<R> = Box<dyn Fn(&R) -> Option<String> + Send + Sync>;
type DefaultFn<R> = Box<dyn Fn(&mut R) + Send + Sync>;

/// One resolved field descriptor: the mapping between a textual key and one
/// attribute of the record type `R`.
///
/// Built through [`FieldBuilder`]; by the time a `FieldDef` exists, its
/// decode strategy has been resolved and its value type erased.
pub struct FieldDef<R> {
    key: &'static str,
    decode: DecodeFn<R>,
    encode: Option<EncodeFn<R>>,
    default: Option<DefaultFn<R>>,
}

impl<R> FieldDef<R> {
    /// The exact, case-sensitive textual key of this field.
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Decodes raw stanza text and stores the result on the record.
    pub(crate) fn apply_text(
        &self,
        record: &mut R,
        text: &str,
    ) -> std::result::Result<(), String> {
        (self.decode)(record, text)
    }

    /// Applies the declared default, if any. Returns `false` when the field
    /// has no default and is therefore required.
    pub(crate) fn apply_default(&self, record: &mut R) -> bool {
        match &self.default {
            Some(default) => {
                default(record);
                true
            }
            None => false,
        }
    }

    /// Encodes the field's current value, or `None` when the field is
    /// write-disabled or its value is not representable (falsy).
    pub(crate) fn encode(&self, record: &R) -> Option<String> {
        self.encode.as_ref().and_then(|encode| encode(record))
    }
}

impl<R> std::fmt::Debug for FieldDef<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDef")
            .field("key", &self.key)
            .field("writable", &self.encode.is_some())
            .field("required", &self.default.is_none())
            .finish()
    }
}

/// Typed builder for a single [`FieldDef`].
///
/// `get` and `set` are plain function pointers bridging the record struct and
/// the erased descriptor; everything else is optional configuration.
pub struct FieldBuilder<R, T> {
    key: &'static str,
    get: fn(&R) -> &T,
    set: fn(&mut R, T),
    decode: Box<dyn Fn(&str) -> std::result::Result<T, String> + Send + Sync>,
    encode: Option<Box<dyn Fn(&T) -> Option<String> + Send + Sync>>,
    default_value: Option<Box<dyn Fn() -> T + Send + Sync>>,
    default_factory: Option<Box<dyn Fn() -> T + Send + Sync>>,
}

impl<R: 'static, T: FieldValue + 'static> FieldBuilder<R, T> {
    /// Declares a field whose decode and encode fall back to the value
    /// type's own [`FieldValue`] conversions.
    ///
    /// The getter closure's parameter needs an explicit type annotation
    /// (`|r: &Package| &r.name`): the record type is not yet unified when
    /// the closure body is checked.
    pub fn new(key: &'static str, get: fn(&R) -> &T, set: fn(&mut R, T)) -> Self {
        Self {
            key,
            get,
            set,
            decode: Box::new(|text| T::parse_text(text)),
            encode: Some(Box::new(|value| value.to_text())),
            default_value: None,
            default_factory: None,
        }
    }
}

impl<R: 'static, T: 'static> FieldBuilder<R, T> {
    /// Declares a field of a type without a [`FieldValue`] impl. The decode
    /// closure is mandatory; the field starts out write-disabled until an
    /// encode closure is supplied through [`encode_with`](Self::encode_with).
    /// As with [`FieldBuilder::new`], annotate the getter closure's
    /// parameter type.
    pub fn custom<D>(key: &'static str, get: fn(&R) -> &T, set: fn(&mut R, T), decode: D) -> Self
    where
        D: Fn(&str) -> std::result::Result<T, String> + Send + Sync + 'static,
    {
        Self {
            key,
            get,
            set,
            decode: Box::new(decode),
            encode: None,
            default_value: None,
            default_factory: None,
        }
    }

    /// Replaces the decode strategy with a custom closure.
    pub fn decode_with<D>(mut self, decode: D) -> Self
    where
        D: Fn(&str) -> std::result::Result<T, String> + Send + Sync + 'static,
    {
        self.decode = Box::new(decode);
        self
    }

    /// Replaces the encode strategy. Returning `None` omits the field.
    pub fn encode_with<E>(mut self, encode: E) -> Self
    where
        E: Fn(&T) -> Option<String> + Send + Sync + 'static,
    {
        self.encode = Some(Box::new(encode));
        self
    }

    /// Write-disables the field: it is read from stanzas but never emitted.
    pub fn skip_encode(mut self) -> Self {
        self.encode = None;
        self
    }

    /// Supplies a default value applied when the key is absent from a stanza.
    pub fn default_value(mut self, value: T) -> Self
    where
        T: Clone + Send + Sync,
    {
        self.default_value = Some(Box::new(move || value.clone()));
        self
    }

    /// Supplies a default factory invoked when the key is absent.
    pub fn default_with<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.default_factory = Some(Box::new(factory));
        self
    }

    /// Erases the value type, producing the final descriptor.
    fn finish(self) -> Result<FieldDef<R>> {
        if self.default_value.is_some() && self.default_factory.is_some() {
            return Err(Deb822Error::ConflictingDefaults { key: self.key });
        }

        let set = self.set;
        let decode_inner = self.decode;
        let decode: DecodeFn<R> = Box::new(move |record, text| {
            let value = decode_inner(text)?;
            set(record, value);
            Ok(())
        });

        let get = self.get;
        let encode = self.encode.map(|encode_inner| -> EncodeFn<R> {
            Box::new(move |record| encode_inner(get(record)))
        });

        let default = self
            .default_value
            .or(self.default_factory)
            .map(|factory| -> DefaultFn<R> { Box::new(move |record| set(record, factory())) });

        Ok(FieldDef {
            key: self.key,
            decode,
            encode,
            default,
        })
    }
}

/// The immutable, declaration-ordered field table of one record type.
///
/// Built once per record type (typically inside a `OnceLock`) and consulted
/// by every parse and write thereafter.
#[derive(Debug)]
pub struct Schema<R> {
    fields: Vec<FieldDef<R>>,
    by_key: HashMap<&'static str, usize>,
}

impl<R: 'static> Schema<R> {
    pub fn builder() -> SchemaBuilder<R> {
        SchemaBuilder { fields: Vec::new() }
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Resolves a textual key to its field index, if declared.
    pub(crate) fn lookup(&self, key: &str) -> Option<usize> {
        self.by_key.get(key).copied()
    }

    /// All descriptors in declaration order.
    pub(crate) fn fields(&self) -> &[FieldDef<R>] {
        &self.fields
    }
}

/// Collects [`FieldBuilder`] declarations into a validated [`Schema`].
pub struct SchemaBuilder<R> {
    fields: Vec<Result<FieldDef<R>>>,
}

impl<R: 'static> SchemaBuilder<R> {
    /// Adds one field declaration. Configuration errors are deferred and
    /// surfaced by [`build`](Self::build).
    pub fn field<T: 'static>(mut self, builder: FieldBuilder<R, T>) -> Self {
        self.fields.push(builder.finish());
        self
    }

    /// Validates the declarations and produces the schema.
    ///
    /// # Errors
    /// Fails if two fields declare the same key, or if any field declares
    /// both a default value and a default factory.
    pub fn build(self) -> Result<Schema<R>> {
        let mut fields = Vec::with_capacity(self.fields.len());
        let mut by_key = HashMap::with_capacity(self.fields.len());

        for field in self.fields {
            let field = field?;
            if by_key.insert(field.key, fields.len()).is_some() {
                return Err(Deb822Error::DuplicateKey { key: field.key });
            }
            fields.push(field);
        }

        Ok(Schema { fields, by_key })
    }
}

/// A record type that can be read from and written to the stanza format.
///
/// `Default` seeds each freshly-assembled record before decoded fields and
/// declared defaults are applied on top of it.
pub trait Deb822Record: Default + 'static {
    /// The field table for this record type, built once and shared.
    fn schema() -> &'static Schema<Self>;

    /// Installs the stanza's collected `Meta-*` mapping on the record.
    fn set_meta(&mut self, meta: MetaMap);
}
