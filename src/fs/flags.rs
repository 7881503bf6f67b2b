// SPDX-License-Identifier: GPL-2.0

//! Open flags, seek whence, and fcntl commands.

use bitflags::bitflags;

/// The access mode half of `open`'s flags bitfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
	ReadOnly,
	WriteOnly,
	ReadWrite,
}

impl AccessMode {
	pub fn is_writable(self) -> bool {
		matches!(self, AccessMode::WriteOnly | AccessMode::ReadWrite)
	}

	pub fn is_readable(self) -> bool {
		matches!(self, AccessMode::ReadOnly | AccessMode::ReadWrite)
	}
}

bitflags! {
	/// Auxiliary bits of `open`'s flags bitfield.
	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	pub struct OpenAux: u32 {
		const DIRECTORY = 1 << 0;
		const APPEND    = 1 << 1;
		const TRUNCATE  = 1 << 2;
	}
}

/// Full set of flags passed to `open`, and stored per-handle for
/// `fcntl(GET_FLAGS)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenFlags {
	pub mode: AccessMode,
	pub aux: OpenAux,
}

impl OpenFlags {
	pub const fn new(mode: AccessMode, aux: OpenAux) -> Self {
		Self { mode, aux }
	}

	pub fn is_directory(&self) -> bool {
		self.aux.contains(OpenAux::DIRECTORY)
	}

	pub fn is_append(&self) -> bool {
		self.aux.contains(OpenAux::APPEND)
	}

	pub fn is_truncate(&self) -> bool {
		self.aux.contains(OpenAux::TRUNCATE)
	}
}

/// `seek`'s reference point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
	Set,
	Current,
	End,
}

/// `fcntl` commands. Only `GetFlags` has an effect; the rest return 0
/// without effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FcntlCmd {
	GetFlags,
	SetFlags,
	GetFdFlags,
	SetFdFlags,
}
