// SPDX-License-Identifier: GPL-2.0

//! Error handling types and utilities

use core::fmt;

/// Filesystem engine error type.
///
/// Scoped to exactly what the operations in [`crate::fs`] can fail with;
/// see the error taxonomy in the module-level documentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
	/// Invalid or non-matching-kind handle for the requested operation.
	BadHandle,
	/// Path did not resolve, or resolved to the wrong kind of node.
	NotFound,
	/// Malformed argument (bad seek, unsupported fcntl, directory-open
	/// combined with a writable mode).
	Invalid,
	/// The node is already open in a mode that excludes the request.
	Busy,
	/// The handle table has no free slots.
	TooManyOpenFiles,
	/// Allocation failed while creating a node or growing a buffer.
	NoMemory,
}

impl Error {
	/// Map to a negative POSIX-style errno, for a host that surfaces
	/// these as syscall return values.
	pub fn to_errno(self) -> i32 {
		match self {
			Error::BadHandle => -9,         // EBADF
			Error::NotFound => -2,          // ENOENT
			Error::Invalid => -22,          // EINVAL
			Error::Busy => -16,             // EBUSY
			Error::TooManyOpenFiles => -24, // EMFILE
			Error::NoMemory => -12,         // ENOMEM
		}
	}
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Error::BadHandle => write!(f, "bad handle"),
			Error::NotFound => write!(f, "not found"),
			Error::Invalid => write!(f, "invalid argument"),
			Error::Busy => write!(f, "resource busy"),
			Error::TooManyOpenFiles => write!(f, "too many open files"),
			Error::NoMemory => write!(f, "out of memory"),
		}
	}
}

/// Engine result type.
pub type Result<T> = core::result::Result<T, Error>;
