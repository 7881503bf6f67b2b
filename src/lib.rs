// SPDX-License-Identifier: GPL-2.0

//! In-memory hierarchical filesystem engine, exported through a VFS
//! operation table (see [`fs::vfs`]).
//!
//! This crate implements only the engine: the node tree, the open-handle
//! table and its read/write exclusion protocol, reallocating content
//! buffers, directory-iteration cursors, and zero-copy attach/detach. The
//! host VFS registry, heap allocator, mutex primitive, and thread scheduler
//! are external collaborators the crate assumes rather than implements.
//!
//! `no_std` outside of tests: the engine owns no hardware and needs no boot
//! sequence to exercise, so its unit tests run under the host test harness
//! while the crate itself still links into a freestanding kernel.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod error;
pub mod fs;
pub mod sync;

pub use error::{Error, Result};
