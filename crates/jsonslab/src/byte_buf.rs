//! Growable byte storage with explicit reservation.
//!
//! Every path that adds bytes reserves through the fallible allocator
//! interface first, so pushing into a full buffer reports [`AllocError`]
//! instead of aborting. String construction and the lexer's source copy are
//! built on this type.

#![allow(dead_code)]

use alloc::{boxed::Box, vec::Vec};

use crate::error::AllocError;

/// A growable byte sequence whose every growth path is fallible.
///
/// `into_boxed_slice` hands the accumulated bytes off without copying when
/// the buffer was reserved to its exact final length, which is how the
/// string and lexer constructors use it.
#[derive(Debug, Default)]
pub(crate) struct ByteBuf {
    data: Vec<u8>,
}

impl ByteBuf {
    pub(crate) fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Creates a buffer with exactly `bytes` of capacity reserved up front.
    pub(crate) fn with_capacity(bytes: usize) -> Result<Self, AllocError> {
        let mut data = Vec::new();
        data.try_reserve_exact(bytes)?;
        Ok(Self { data })
    }

    pub(crate) fn push(&mut self, byte: u8) -> Result<(), AllocError> {
        if self.data.len() == self.data.capacity() {
            self.data.try_reserve(1)?;
        }
        self.data.push(byte);
        Ok(())
    }

    pub(crate) fn extend_from_slice(&mut self, bytes: &[u8]) -> Result<(), AllocError> {
        self.data.try_reserve(bytes.len())?;
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.data.clear();
    }

    pub(crate) fn into_boxed_slice(self) -> Box<[u8]> {
        self.data.into_boxed_slice()
    }
}
