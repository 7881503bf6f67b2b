// SPDX-License-Identifier: GPL-2.0

//! Path resolution: walks a slash-delimited path from a starting
//! directory, case-insensitively, refusing to resolve through anything
//! but directories.

use crate::error::{Error, Result};
use crate::fs::node::{NodeArena, NodeId, NodeKind};

/// What kind of node the terminal path segment is expected to name.
///
/// `Any` exists for `open`'s use: the caller there wants the resolver to
/// find whatever node is at the path regardless of kind, so `open` can
/// tell apart "nothing there" (`NotFound`, creatable when writable) from
/// "wrong kind of thing there" (`Invalid`, never creatable) itself. Every
/// other caller asks for an exact `File` or `Directory` and gets a
/// terminal kind mismatch folded into `NotFound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Want {
	File,
	Directory,
	Any,
}

/// Resolve `path` starting from `start`, stripping a leading `/` and
/// walking `/`-delimited segments. Every intermediate segment must resolve
/// to a directory; the terminal segment must match `want` exactly and is
/// never silently promoted to another kind.
///
/// An empty terminal segment (trailing slash, or the path was empty or
/// just `/`) means "the directory itself", and only succeeds when `want`
/// accepts a directory (`Directory` or `Any`).
pub fn resolve(arena: &NodeArena, start: NodeId, path: &str, want: Want) -> Result<NodeId> {
	let path = path.strip_prefix('/').unwrap_or(path);

	if path.is_empty() {
		return if want != Want::File { Ok(start) } else { Err(Error::NotFound) };
	}

	let mut current = start;
	let mut segments = path.split('/').peekable();

	while let Some(segment) = segments.next() {
		let is_last = segments.peek().is_none();

		if segment.is_empty() && is_last {
			// Trailing slash: "the directory itself" at this point.
			return if want != Want::File { Ok(current) } else { Err(Error::NotFound) };
		}

		let child = arena
			.find_child(current, segment)?
			.ok_or(Error::NotFound)?;

		if is_last {
			let matches = match (arena.get(child)?.kind, want) {
				(_, Want::Any) => true,
				(NodeKind::File, Want::File) => true,
				(NodeKind::Directory, Want::Directory) => true,
				_ => false,
			};
			return if matches { Ok(child) } else { Err(Error::NotFound) };
		}

		if arena.get(child)?.kind != NodeKind::Directory {
			return Err(Error::NotFound);
		}
		current = child;
	}

	unreachable!("split('/') on a non-empty string always yields at least one segment")
}

/// Split `path` into its parent directory and leaf name, resolving the
/// parent from `start`. The leaf is returned as a borrowed view into
/// `path` and must not itself contain a trailing slash (rejected as
/// `NotFound`, matching the resolver's error taxonomy).
pub fn resolve_parent_leaf<'p>(
	arena: &NodeArena,
	start: NodeId,
	path: &'p str,
) -> Result<(NodeId, &'p str)> {
	let path = path.strip_prefix('/').unwrap_or(path);

	match path.rfind('/') {
		Some(idx) => {
			let (parent_path, leaf) = (&path[..idx], &path[idx + 1..]);
			if leaf.is_empty() {
				return Err(Error::NotFound);
			}
			let parent = resolve(arena, start, parent_path, Want::Directory)?;
			Ok((parent, leaf))
		}
		None => {
			if path.is_empty() {
				return Err(Error::NotFound);
			}
			Ok((start, path))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fs::node::NodeContent;

	fn mkdir(arena: &mut NodeArena, parent: NodeId, name: &str) -> NodeId {
		arena
			.create(parent, name, NodeKind::Directory, NodeContent::new_directory())
			.unwrap()
	}

	fn mkfile(arena: &mut NodeArena, parent: NodeId, name: &str) -> NodeId {
		arena
			.create(parent, name, NodeKind::File, NodeContent::new_file(0).unwrap())
			.unwrap()
	}

	#[test]
	fn resolves_root_with_trailing_empty_segment() {
		let arena = NodeArena::new();
		assert_eq!(resolve(&arena, arena.root, "", Want::Directory).unwrap(), arena.root);
		assert_eq!(resolve(&arena, arena.root, "/", Want::Directory).unwrap(), arena.root);
		assert!(resolve(&arena, arena.root, "", Want::File).is_err());
	}

	#[test]
	fn resolves_nested_file_case_insensitively() {
		let mut arena = NodeArena::new();
		let a = mkdir(&mut arena, arena.root, "A");
		let f = mkfile(&mut arena, a, "Hello.TXT");

		assert_eq!(resolve(&arena, arena.root, "a/hello.txt", Want::File).unwrap(), f);
		assert_eq!(resolve(&arena, arena.root, "A/Hello.TXT", Want::File).unwrap(), f);
	}

	#[test]
	fn intermediate_segment_must_be_directory() {
		let mut arena = NodeArena::new();
		let f = mkfile(&mut arena, arena.root, "f");
		let _ = f;
		assert_eq!(
			resolve(&arena, arena.root, "f/g", Want::File).unwrap_err(),
			Error::NotFound
		);
	}

	#[test]
	fn terminal_kind_mismatch_is_not_found() {
		let mut arena = NodeArena::new();
		mkfile(&mut arena, arena.root, "f");
		assert_eq!(
			resolve(&arena, arena.root, "f", Want::Directory).unwrap_err(),
			Error::NotFound
		);
	}

	#[test]
	fn non_recursive_creation_path_fails() {
		let arena = NodeArena::new();
		assert_eq!(
			resolve(&arena, arena.root, "a/b/c.bin", Want::File).unwrap_err(),
			Error::NotFound
		);
	}

	#[test]
	fn parent_leaf_split() {
		let mut arena = NodeArena::new();
		let a = mkdir(&mut arena, arena.root, "a");
		let (parent, leaf) = resolve_parent_leaf(&arena, arena.root, "a/b.txt").unwrap();
		assert_eq!(parent, a);
		assert_eq!(leaf, "b.txt");

		let (parent, leaf) = resolve_parent_leaf(&arena, arena.root, "top.txt").unwrap();
		assert_eq!(parent, arena.root);
		assert_eq!(leaf, "top.txt");
	}
}
