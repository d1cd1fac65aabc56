//! Keyed objects backed by the slab-chained hash map.
//!
//! [`Object`] is the only public face of the map: creation, lookup, update,
//! removal, iteration, and deep copy all go through it. The engine itself
//! lives in [`map`] and is not exported.

mod map;

use core::fmt;

use crate::{
    error::AllocError,
    value::{JsonString, Value},
};
use map::{INITIAL_BUCKETS, RawMap};

/// A mutable mapping from byte-string keys to [`Value`]s.
///
/// Keys are unique. Lookup keys are plain byte slices; stored keys are owned
/// copies made at insertion time. An object owns every key and value in it
/// and releases them all when dropped.
///
/// Deep copy is [`Object::try_clone`]; there is no `Clone` because copying
/// allocates and allocation can fail.
///
/// # Examples
///
/// ```
/// use jsonslab::{Object, Value};
///
/// let mut obj = Object::new()?;
/// obj.set(b"answer", Value::from(42.0))?;
/// assert_eq!(obj.get(b"answer"), Some(&Value::Number(42.0)));
///
/// obj.set(b"answer", Value::from(43.0))?;
/// assert_eq!(obj.len(), 1);
///
/// assert!(obj.remove(b"answer"));
/// assert_eq!(obj.get(b"answer"), None);
/// # Ok::<(), jsonslab::AllocError>(())
/// ```
pub struct Object {
    map: RawMap,
}

impl Object {
    /// Creates an empty object with the default bucket capacity.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if the backing storage cannot be allocated.
    pub fn new() -> Result<Self, AllocError> {
        Self::with_capacity(INITIAL_BUCKETS)
    }

    /// Creates an empty object with `buckets` home buckets.
    ///
    /// A small bucket count is useful to exercise collision chains and
    /// growth; the map still grows itself as entries accumulate.
    ///
    /// # Panics
    ///
    /// Panics if `buckets` is zero.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if the backing storage cannot be allocated.
    pub fn with_capacity(buckets: usize) -> Result<Self, AllocError> {
        assert!(buckets > 0, "an object cannot have zero buckets");
        Ok(Self {
            map: RawMap::with_buckets(buckets)?,
        })
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Looks up a key. Read-only and allocation-free.
    #[must_use]
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.map.get(key)
    }

    /// Inserts a key that is not yet present, copying the key bytes.
    ///
    /// Inserting a key that already exists is a contract violation, checked
    /// by a debug assertion; use [`Object::set`] to replace values. On
    /// failure the object is unchanged apart from possibly enlarged spare
    /// capacity.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if the key copy or chain storage cannot be
    /// allocated.
    pub fn insert(&mut self, key: &[u8], value: Value) -> Result<(), AllocError> {
        self.map.insert(key, value)
    }

    /// Replaces the value of an existing key, or inserts the key if it is
    /// absent.
    ///
    /// A replacement drops the old value in place and never reallocates or
    /// re-chains the entry.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if an insert was needed and its allocation
    /// failed. A replacement never fails.
    pub fn set(&mut self, key: &[u8], value: Value) -> Result<(), AllocError> {
        match self.map.update(key, value) {
            Ok(()) => Ok(()),
            Err(value) => self.map.insert(key, value),
        }
    }

    /// Removes a key, dropping its value. Returns whether it was present.
    pub fn remove(&mut self, key: &[u8]) -> bool {
        self.map.remove(key)
    }

    /// Deep-copies the object and everything in it.
    ///
    /// The copy is all-or-nothing: if any allocation fails, everything
    /// copied so far is released and `self` is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if any allocation along the way fails.
    pub fn try_clone(&self) -> Result<Self, AllocError> {
        Ok(Self {
            map: self.map.try_clone()?,
        })
    }

    /// Iterates over `(key, value)` pairs in unspecified order.
    pub fn iter(&self) -> ObjectIter<'_> {
        ObjectIter {
            inner: self.map.iter(),
        }
    }
}

/// Iterator over an [`Object`]'s live entries. Order is unspecified.
pub struct ObjectIter<'a> {
    inner: map::Iter<'a>,
}

impl<'a> Iterator for ObjectIter<'a> {
    type Item = (&'a JsonString, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl<'a> IntoIterator for &'a Object {
    type Item = (&'a JsonString, &'a Value);
    type IntoIter = ObjectIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Key-set equality with equal values, independent of storage layout.
impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|(k, v)| other.get(k.as_bytes()) == Some(v))
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
