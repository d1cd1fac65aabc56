//! JSON value types.
//!
//! This module defines the [`Value`] enum together with its two flat
//! containers, [`JsonString`] and [`Array`]. Strings are raw byte sequences
//! (not required to be UTF-8) and arrays are fixed once built; both uphold
//! the rule that a zero-length container owns no heap storage. Everything
//! that allocates returns `Result`, including deep copies.

use alloc::{boxed::Box, vec::Vec};
use core::fmt;

use bstr::BStr;

use crate::{byte_buf::ByteBuf, error::AllocError, object::Object};

/// An owned, immutable byte string.
///
/// Keys and string values are byte-oriented: any byte sequence is
/// representable, UTF-8 or not. The empty string owns no heap storage, so
/// [`JsonString::new`] never allocates and never fails.
///
/// # Examples
///
/// ```
/// use jsonslab::JsonString;
///
/// let s = JsonString::from_bytes(b"zig")?;
/// assert_eq!(s.as_bytes(), b"zig");
/// assert_eq!(s, "zig");
/// # Ok::<(), jsonslab::AllocError>(())
/// ```
#[derive(Default, PartialEq, Eq)]
pub struct JsonString {
    bytes: Box<[u8]>,
}

impl JsonString {
    /// Creates an empty string without allocating.
    #[must_use]
    pub fn new() -> Self {
        Self { bytes: Box::default() }
    }

    /// Copies `bytes` into freshly allocated storage.
    ///
    /// A zero-length input takes the [`JsonString::new`] path and performs
    /// no allocation.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if the copy cannot be allocated.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AllocError> {
        if bytes.is_empty() {
            return Ok(Self::new());
        }
        let mut buf = ByteBuf::with_capacity(bytes.len())?;
        buf.extend_from_slice(bytes)?;
        Ok(Self { bytes: buf.into_boxed_slice() })
    }

    /// Copies this string into new storage.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if the copy cannot be allocated; `self` is
    /// untouched either way.
    pub fn try_clone(&self) -> Result<Self, AllocError> {
        Self::from_bytes(&self.bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl PartialEq<&[u8]> for JsonString {
    fn eq(&self, other: &&[u8]) -> bool {
        &*self.bytes == *other
    }
}

impl PartialEq<&str> for JsonString {
    fn eq(&self, other: &&str) -> bool {
        &*self.bytes == other.as_bytes()
    }
}

impl PartialEq<str> for JsonString {
    fn eq(&self, other: &str) -> bool {
        &*self.bytes == other.as_bytes()
    }
}

impl fmt::Debug for JsonString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(BStr::new(&self.bytes), f)
    }
}

impl fmt::Display for JsonString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(BStr::new(&self.bytes), f)
    }
}

/// An owned, fixed-length sequence of [`Value`]s.
///
/// Arrays are built once, from a `Vec` or by [`Array::concat`], and read
/// thereafter. The empty array owns no heap storage. Dropping an array drops
/// every element it owns.
///
/// # Examples
///
/// ```
/// use jsonslab::{Array, Value};
///
/// let arr = Array::from(vec![Value::from(1.0), Value::Null]);
/// assert_eq!(arr.len(), 2);
/// assert_eq!(arr.get(1), Some(&Value::Null));
/// assert_eq!(arr.get(2), None);
/// ```
#[derive(Debug, Default, PartialEq)]
pub struct Array {
    items: Box<[Value]>,
}

impl Array {
    /// Creates an empty array without allocating.
    #[must_use]
    pub fn new() -> Self {
        Self { items: Box::default() }
    }

    /// Joins two arrays into one, reusing the elements of both.
    ///
    /// Both inputs are consumed; their elements move into the result in
    /// order. When either side is empty the other is returned as-is, so no
    /// allocation happens.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if the combined storage cannot be allocated.
    /// The elements of both inputs are released in that case.
    pub fn concat(self, other: Self) -> Result<Self, AllocError> {
        if self.is_empty() {
            return Ok(other);
        }
        if other.is_empty() {
            return Ok(self);
        }
        let mut items = Vec::new();
        items.try_reserve_exact(self.items.len() + other.items.len())?;
        items.extend(self.items.into_vec());
        items.extend(other.items.into_vec());
        Ok(Self { items: items.into_boxed_slice() })
    }

    /// Deep-copies this array and every element in it.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if any allocation along the way fails. The
    /// partially built copy is released before returning; `self` is
    /// untouched.
    pub fn try_clone(&self) -> Result<Self, AllocError> {
        if self.is_empty() {
            return Ok(Self::new());
        }
        let mut items = Vec::new();
        items.try_reserve_exact(self.items.len())?;
        for item in &self.items {
            items.push(item.try_clone()?);
        }
        Ok(Self { items: items.into_boxed_slice() })
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Value> {
        self.items.iter()
    }
}

impl From<Vec<Value>> for Array {
    fn from(items: Vec<Value>) -> Self {
        debug_assert!(
            items.iter().all(|v| !v.is_invalid()),
            "the vacant sentinel must not be stored in an array",
        );
        Self { items: items.into_boxed_slice() }
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = core::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// A JSON value.
///
/// `Value` is a closed union over the JSON data types plus [`Invalid`], the
/// vacant-slot sentinel the object map uses internally. No constructor or
/// conversion in this crate produces `Invalid`, and containers reject it in
/// debug builds; it exists so that slot vacancy needs no flag beside the
/// value.
///
/// There is no `Clone`: copying a tree allocates, so deep copy is the
/// fallible [`Value::try_clone`].
///
/// # Examples
///
/// ```
/// use jsonslab::{JsonString, Object, Value};
///
/// let mut obj = Object::new()?;
/// obj.set(b"key", Value::from(JsonString::from_bytes(b"value")?))?;
/// let v = Value::from(obj);
/// assert_eq!(v.to_string(), r#"{"key":"value"}"#);
/// # Ok::<(), jsonslab::AllocError>(())
/// ```
///
/// [`Invalid`]: Value::Invalid
#[derive(Debug, PartialEq)]
pub enum Value {
    /// Vacant-slot sentinel. Never present in a well-formed tree.
    Invalid,
    Null,
    Boolean(bool),
    Number(f64),
    String(JsonString),
    Array(Array),
    Object(Object),
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<JsonString> for Value {
    fn from(v: JsonString) -> Self {
        Self::String(v)
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Self::Array(v)
    }
}

impl From<Object> for Value {
    fn from(v: Object) -> Self {
        Self::Object(v)
    }
}

impl Value {
    /// Deep-copies this value and everything it owns.
    ///
    /// Scalars copy trivially. For strings, arrays, and objects the copy is
    /// all-or-nothing: if any nested allocation fails, everything copied so
    /// far is released and `self` is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if any allocation along the way fails.
    pub fn try_clone(&self) -> Result<Self, AllocError> {
        Ok(match self {
            Self::Invalid => Self::Invalid,
            Self::Null => Self::Null,
            Self::Boolean(b) => Self::Boolean(*b),
            Self::Number(n) => Self::Number(*n),
            Self::String(s) => Self::String(s.try_clone()?),
            Self::Array(a) => Self::Array(a.try_clone()?),
            Self::Object(o) => Self::Object(o.try_clone()?),
        })
    }

    /// Returns `true` if the value is the vacant-slot sentinel.
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid)
    }

    /// Returns `true` if the value is [`Null`].
    ///
    /// [`Null`]: Value::Null
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonslab::Value;
    ///
    /// assert!(Value::Null.is_null());
    /// assert!(!Value::Boolean(false).is_null());
    /// ```
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if the value is [`Boolean`].
    ///
    /// [`Boolean`]: Value::Boolean
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Boolean(..))
    }

    /// Returns `true` if the value is [`Number`].
    ///
    /// [`Number`]: Value::Number
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(..))
    }

    /// Returns `true` if the value is [`String`].
    ///
    /// [`String`]: Value::String
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(..))
    }

    /// Returns `true` if the value is [`Array`].
    ///
    /// [`Array`]: Value::Array
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(..))
    }

    /// Returns `true` if the value is [`Object`].
    ///
    /// [`Object`]: Value::Object
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(..))
    }

    /// If the value is a boolean, returns it.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonslab::Value;
    ///
    /// assert_eq!(Value::Boolean(true).as_bool(), Some(true));
    /// assert_eq!(Value::Null.as_bool(), None);
    /// ```
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a number, returns it.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it.
    #[must_use]
    pub fn as_string(&self) -> Option<&JsonString> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is an array, returns a reference to it.
    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// If the value is an object, returns a reference to it.
    #[must_use]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }
}

/// Escapes one valid UTF-8 fragment into a JSON string literal body.
///
/// Quotes, backslashes, control characters, and the U+2028/U+2029 line
/// separators become escape sequences; everything else passes through
/// unchanged.
fn write_escaped_str<W: fmt::Write>(src: &str, f: &mut W) -> fmt::Result {
    for c in src.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\u{2028}' | '\u{2029}' => write!(f, "\\u{:04X}", c as u32)?,
            c if c.is_control() => write!(f, "\\u{:04X}", c as u32)?,
            _ => f.write_char(c)?,
        }
    }
    Ok(())
}

/// Escapes an arbitrary byte string into a JSON string literal body.
///
/// Ill-formed UTF-8 is rendered lossily, one replacement character per
/// invalid run, mirroring how the byte strings print via `bstr`.
pub(crate) fn write_escaped_bytes<W: fmt::Write>(src: &[u8], f: &mut W) -> fmt::Result {
    for chunk in src.utf8_chunks() {
        write_escaped_str(chunk.valid(), f)?;
        if !chunk.invalid().is_empty() {
            f.write_char(char::REPLACEMENT_CHARACTER)?;
        }
    }
    Ok(())
}

impl fmt::Display for Value {
    /// Serializes the value as JSON text.
    ///
    /// Non-finite numbers and the vacant sentinel render as `null`, which
    /// keeps the output parseable; neither occurs in well-formed trees built
    /// from finite numbers.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Invalid | Value::Null => f.write_str("null"),
            Value::Boolean(b) => f.write_str(if *b { "true" } else { "false" }),
            Value::Number(n) if n.is_finite() => write!(f, "{n}"),
            Value::Number(_) => f.write_str("null"),
            Value::String(s) => {
                f.write_str("\"")?;
                write_escaped_bytes(s.as_bytes(), f)?;
                f.write_str("\"")
            }
            Value::Array(arr) => {
                f.write_str("[")?;
                let mut first = true;
                for v in arr {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
            Value::Object(obj) => {
                f.write_str("{")?;
                let mut first = true;
                for (k, v) in obj {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    f.write_str("\"")?;
                    write_escaped_bytes(k.as_bytes(), f)?;
                    write!(f, "\":{v}")?;
                }
                f.write_str("}")
            }
        }
    }
}
