// SPDX-License-Identifier: GPL-2.0

//! The open-handle table: a fixed-capacity array mapping handle IDs to
//! `(node, mode, cursor)` tuples.

use crate::error::{Error, Result};
use crate::fs::flags::OpenFlags;
use crate::fs::node::NodeId;

/// Maximum number of simultaneously open handles. Slot 0 is reserved, so
/// `MAX_HANDLES - 1` handles are actually usable.
pub const MAX_HANDLES: usize = 64;

/// Per-handle cursor: a byte offset for files, or the index of the next
/// child to yield for directories.
#[derive(Debug, Clone, Copy)]
pub enum HandleCursor {
	File(usize),
	Directory(Option<usize>),
}

#[derive(Debug, Clone)]
pub struct Handle {
	pub node: NodeId,
	pub is_directory: bool,
	pub cursor: HandleCursor,
	pub open_flags: OpenFlags,
}

enum Slot {
	Occupied(Handle),
	Free,
}

/// Fixed-capacity handle table. Allocation linearly scans from index 1 for
/// the first free slot; slot 0 never holds a handle.
pub struct HandleTable {
	slots: [Slot; MAX_HANDLES],
}

impl HandleTable {
	pub fn new() -> Self {
		Self {
			slots: core::array::from_fn(|_| Slot::Free),
		}
	}

	/// Whether at least one slot is free. Used to check handle-table
	/// exhaustion before mutating any node state, per the precondition
	/// order `open` enforces.
	pub fn has_free_slot(&self) -> bool {
		self.slots[1..].iter().any(|s| matches!(s, Slot::Free))
	}

	/// Allocate a handle slot. Returns `TooManyOpenFiles` on exhaustion.
	pub fn allocate(&mut self, handle: Handle) -> Result<usize> {
		for id in 1..MAX_HANDLES {
			if matches!(self.slots[id], Slot::Free) {
				self.slots[id] = Slot::Occupied(handle);
				return Ok(id);
			}
		}
		Err(Error::TooManyOpenFiles)
	}

	pub fn get(&self, id: usize) -> Result<&Handle> {
		match self.slots.get(id) {
			Some(Slot::Occupied(h)) => Ok(h),
			_ => Err(Error::BadHandle),
		}
	}

	pub fn get_mut(&mut self, id: usize) -> Result<&mut Handle> {
		match self.slots.get_mut(id) {
			Some(Slot::Occupied(h)) => Ok(h),
			_ => Err(Error::BadHandle),
		}
	}

	/// Release a handle slot. Unknown or already-free handles are silently
	/// tolerated, returning `None` in that case rather than an error,
	/// leaving it to the caller whether that's worth reporting.
	pub fn release(&mut self, id: usize) -> Option<Handle> {
		match self.slots.get_mut(id) {
			Some(slot @ Slot::Occupied(_)) => {
				let freed = core::mem::replace(slot, Slot::Free);
				match freed {
					Slot::Occupied(h) => Some(h),
					Slot::Free => unreachable!(),
				}
			}
			_ => None,
		}
	}
}
