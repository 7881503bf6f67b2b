// SPDX-License-Identifier: GPL-2.0

//! The in-memory filesystem engine: node store, path resolver, handle
//! table, operation engine, attach bridge, and the VFS-facing operation
//! table and lifecycle.

pub mod attach;
pub mod engine;
pub mod flags;
pub mod handle;
pub mod mode;
pub mod node;
pub mod path;
pub mod vfs;

pub use engine::{DirEntry, RamFs, Stat};
pub use flags::{AccessMode, FcntlCmd, OpenAux, OpenFlags, Whence};
pub use vfs::{init, shutdown, MOUNT_NAME, OPERATIONS};
