#![deny(clippy::all)]

//! Shared storage for immutable strings.
//!
//! Programs that build the same string content over and over, symbol
//! names, configuration keys, identifiers, pay for every copy twice:
//! once in memory and once in every comparison. A [`StringPool`] stores
//! each distinct content exactly once. [`intern`] hands out a pointer
//! sized [`Interned`] handle to the canonical copy, repeated interns of
//! equal content return the same handle, and [`release`] gives one unit
//! of ownership back. Storage is reclaimed the moment the last handle to
//! an entry is released.
//!
//! Lookup runs through a two level index: the low byte of the content
//! hash picks one of 256 buckets, the next byte orders collision heads
//! inside the bucket's search tree, and distinct strings that share both
//! bytes are told apart by comparing actual content inside the head's
//! chain.
//!
//! The pool is single threaded by design. Wrap it in external mutual
//! exclusion if it must be shared.
//!
//! [`intern`]: StringPool::intern
//! [`release`]: StringPool::release

pub mod hash;
pub mod managed;
mod pool;
mod usage;

pub use managed::Interned;
pub use pool::{StringPool, ABORT_ENV};
pub use usage::UsageReport;
