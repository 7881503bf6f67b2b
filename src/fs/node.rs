// SPDX-License-Identifier: GPL-2.0

//! The node store: an arena of file/directory nodes linked into sibling
//! lists.
//!
//! Nodes are keyed by integer `NodeId` rather than linked intrusively by
//! pointer, since Rust has no safe equivalent of an intrusive singly-linked
//! list without `unsafe`. Each directory node owns an ordered `Vec<NodeId>`
//! of its children instead.

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::{Error, Result};
use crate::fs::mode;

/// Index into a [`NodeArena`]. Stable for the node's lifetime; reused
/// after the node is freed by `unlink`.
pub type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
	File,
	Directory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
	None,
	Reading,
	Writing,
}

#[derive(Debug)]
pub enum NodeContent {
	File {
		/// Always `logical_size <= buffer.len()`; `buffer.len()` is the
		/// node's reported capacity, bytes past `logical_size` are
		/// zero-filled slack rather than meaningful content.
		buffer: Vec<u8>,
		logical_size: usize,
	},
	Directory {
		children: Vec<NodeId>,
	},
}

impl NodeContent {
	/// Allocate a fresh, zero-filled file buffer of `capacity` bytes.
	/// Fallible: a host kernel's allocator can fail, and spec requires
	/// that failure surface as `Error::NoMemory` rather than abort.
	pub fn new_file(capacity: usize) -> Result<Self> {
		Ok(NodeContent::File {
			buffer: try_zeroed_vec(capacity)?,
			logical_size: 0,
		})
	}

	pub fn new_directory() -> Self {
		NodeContent::Directory { children: Vec::new() }
	}
}

/// Allocate a zero-filled `Vec<u8>` of exactly `len` bytes without
/// aborting on allocation failure.
pub fn try_zeroed_vec(len: usize) -> Result<Vec<u8>> {
	let mut buffer = Vec::new();
	buffer.try_reserve_exact(len).map_err(|_| Error::NoMemory)?;
	buffer.resize(len, 0);
	Ok(buffer)
}

#[derive(Debug)]
pub struct Node {
	pub name: String,
	pub kind: NodeKind,
	pub content: NodeContent,
	pub open_mode: OpenMode,
	pub use_count: u32,
	pub parent: Option<NodeId>,
}

impl Node {
	pub fn capacity(&self) -> usize {
		match &self.content {
			NodeContent::File { buffer, .. } => buffer.len(),
			NodeContent::Directory { .. } => 0,
		}
	}

	pub fn logical_size(&self) -> usize {
		match &self.content {
			NodeContent::File { logical_size, .. } => *logical_size,
			NodeContent::Directory { .. } => 0,
		}
	}

	pub fn stat_mode(&self) -> u32 {
		match self.kind {
			NodeKind::File => mode::S_IFREG | mode::RW_ALL,
			NodeKind::Directory => mode::S_IFDIR | mode::RW_ALL | mode::X_ALL,
		}
	}

	fn children(&self) -> Result<&Vec<NodeId>> {
		match &self.content {
			NodeContent::Directory { children } => Ok(children),
			NodeContent::File { .. } => Err(Error::NotFound),
		}
	}

	fn children_mut(&mut self) -> Result<&mut Vec<NodeId>> {
		match &mut self.content {
			NodeContent::Directory { children } => Ok(children),
			NodeContent::File { .. } => Err(Error::NotFound),
		}
	}
}

enum Slot {
	Occupied(Node),
	Free(Option<NodeId>),
}

/// Heap-allocated arena of nodes. Stands in for the source's direct heap
/// allocation of node structs — `unlink` returns a freed slot to the free
/// list so steady create/unlink churn does not grow the arena unbounded.
pub struct NodeArena {
	slots: Vec<Slot>,
	free_head: Option<NodeId>,
	pub root: NodeId,
}

impl NodeArena {
	/// Allocate the arena with a permanently-resident root directory
	/// named `/`. The root is never freed.
	pub fn new() -> Self {
		let root = Node {
			name: String::from("/"),
			kind: NodeKind::Directory,
			content: NodeContent::new_directory(),
			open_mode: OpenMode::None,
			use_count: 0,
			parent: None,
		};
		Self {
			slots: alloc::vec![Slot::Occupied(root)],
			free_head: None,
			root: 0,
		}
	}

	pub fn get(&self, id: NodeId) -> Result<&Node> {
		match self.slots.get(id) {
			Some(Slot::Occupied(node)) => Ok(node),
			_ => Err(Error::NotFound),
		}
	}

	pub fn get_mut(&mut self, id: NodeId) -> Result<&mut Node> {
		match self.slots.get_mut(id) {
			Some(Slot::Occupied(node)) => Ok(node),
			_ => Err(Error::NotFound),
		}
	}

	/// Create a node and link it as a child of `parent`. Caller has
	/// already checked name uniqueness.
	pub fn create(&mut self, parent: NodeId, name: &str, kind: NodeKind, content: NodeContent) -> Result<NodeId> {
		let node = Node {
			name: String::from(name),
			kind,
			content,
			open_mode: OpenMode::None,
			use_count: 0,
			parent: Some(parent),
		};

		let id = match self.free_head {
			Some(free) => {
				self.free_head = match &self.slots[free] {
					Slot::Free(next) => *next,
					Slot::Occupied(_) => unreachable!("free list points at an occupied slot"),
				};
				self.slots[free] = Slot::Occupied(node);
				free
			}
			None => {
				self.slots.push(Slot::Occupied(node));
				self.slots.len() - 1
			}
		};

		self.get_mut(parent)?.children_mut()?.push(id);
		Ok(id)
	}

	/// Destroy a node, unlinking it from its parent. Callers must only do
	/// this once the node's `use_count` has reached zero.
	pub fn destroy(&mut self, id: NodeId) -> Result<()> {
		let parent = self.get(id)?.parent;
		if let Some(parent) = parent {
			let siblings = self.get_mut(parent)?.children_mut()?;
			if let Some(pos) = siblings.iter().position(|&c| c == id) {
				siblings.swap_remove(pos);
			}
		}
		self.slots[id] = Slot::Free(self.free_head);
		self.free_head = Some(id);
		Ok(())
	}

	pub fn children_of(&self, dir: NodeId) -> Result<&[NodeId]> {
		Ok(self.get(dir)?.children()?.as_slice())
	}

	/// Case-insensitive lookup of `name` among `dir`'s children.
	pub fn find_child(&self, dir: NodeId, name: &str) -> Result<Option<NodeId>> {
		for &child in self.get(dir)?.children()? {
			if names_equal_ci(self.get(child)?.name.as_bytes(), name.as_bytes()) {
				return Ok(Some(child));
			}
		}
		Ok(None)
	}
}

/// Case-insensitive byte-string equality, comparing length first then
/// bytes.
pub fn names_equal_ci(a: &[u8], b: &[u8]) -> bool {
	a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.eq_ignore_ascii_case(y))
}
