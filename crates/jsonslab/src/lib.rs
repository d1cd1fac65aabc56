//! An in-memory JSON value model over fallible allocation, backed by a
//! slab-chained hash map, plus a position-tracking tokenizer for JSON text.
//!
//! Everything that allocates returns [`Result`]; contract violations panic.
//! The crate is `no_std` and talks to the global allocator only through
//! fallible reservation, so an embedder can substitute an arena or pool
//! allocator with `#[global_allocator]`.

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod byte_buf;
mod error;
mod hash;
mod value;

mod lexer;
mod object;

#[cfg(test)]
mod tests;

pub use error::AllocError;
pub use lexer::{Dialect, Lexer, Span, Token, TokenKind};
pub use object::{Object, ObjectIter};
pub use value::{Array, JsonString, Value};
