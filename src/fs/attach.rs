// SPDX-License-Identifier: GPL-2.0

//! The attach bridge: splice a caller-owned buffer into a node as
//! `attach`, or extract a node's buffer as `detach`, transferring
//! ownership either way. Both reuse `open`/`close` so they inherit the
//! engine's full exclusion protocol rather than reimplementing it.

use alloc::vec::Vec;

use crate::error::Result;
use crate::fs::engine::{RamFs, DETACH_PLACEHOLDER_CAPACITY};
use crate::fs::flags::{AccessMode, OpenAux, OpenFlags};

/// Install `buffer` as the content of the file at `path`, creating it if
/// absent. Ownership of `buffer` transfers to the filesystem; its prior
/// content buffer (freshly-allocated if the node was just created) is
/// dropped.
pub fn attach(fs: &RamFs, path: &str, buffer: Vec<u8>) -> Result<()> {
	let flags = OpenFlags::new(AccessMode::WriteOnly, OpenAux::TRUNCATE);
	let handle = fs.open(path, flags)?;
	let len = buffer.len();
	let result = fs.splice_buffer(handle, buffer, len);
	fs.close(handle).ok();
	result
}

/// Remove the file at `path`, returning its content buffer and logical
/// size to the caller. The node's buffer is replaced with a small
/// placeholder so the node stays well-formed for the brief window before
/// `unlink`, then the node itself is unlinked.
///
/// If `unlink` turns out to fail — another handle opened the same node
/// between this function's `open` and `close`, so `use_count` didn't
/// drop back to zero — the just-extracted buffer is spliced back onto
/// the node rather than discarded, so the caller's data survives and the
/// node is left exactly as `stat`/`read` would have found it had
/// `detach` never run.
pub fn detach(fs: &RamFs, path: &str) -> Result<(Vec<u8>, usize)> {
	let flags = OpenFlags::new(AccessMode::ReadOnly, OpenAux::empty());
	let handle = fs.open(path, flags)?;
	let taken = fs.take_buffer(handle, DETACH_PLACEHOLDER_CAPACITY);
	fs.close(handle).ok();
	let taken = taken?;
	if let Err(e) = fs.unlink(path) {
		fs.restore_buffer(path, taken.0, taken.1).ok();
		return Err(e);
	}
	Ok(taken)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn attach_detach_round_trip() {
		let fs = RamFs::new();
		attach(&fs, "blob", alloc::vec![0xAA, 0xBB, 0xCC]).unwrap();

		let st = fs.stat("blob").unwrap();
		assert_eq!(st.size, 3);

		let (bytes, n) = detach(&fs, "blob").unwrap();
		assert_eq!(bytes, alloc::vec![0xAA, 0xBB, 0xCC]);
		assert_eq!(n, 3);
		assert_eq!(fs.stat("blob").unwrap_err(), crate::error::Error::NotFound);
	}

	#[test]
	fn attach_overwrites_existing_file() {
		let fs = RamFs::new();
		let h = fs.open("x", OpenFlags::new(AccessMode::WriteOnly, OpenAux::empty())).unwrap();
		fs.write(h, b"old content").unwrap();
		fs.close(h).unwrap();

		attach(&fs, "x", alloc::vec![1, 2, 3]).unwrap();
		let (bytes, n) = detach(&fs, "x").unwrap();
		assert_eq!(n, 3);
		assert_eq!(bytes, alloc::vec![1, 2, 3]);
	}

	#[test]
	fn detach_restores_content_when_still_referenced() {
		let fs = RamFs::new();
		attach(&fs, "shared", alloc::vec![1, 2, 3, 4]).unwrap();

		// A concurrent reader keeps `use_count` above zero across
		// `detach`'s own open/close, so its `unlink` must fail.
		let reader = fs.open("shared", OpenFlags::new(AccessMode::ReadOnly, OpenAux::empty())).unwrap();

		assert_eq!(detach(&fs, "shared").unwrap_err(), crate::error::Error::Busy);

		// The original content must survive, not the 64-byte placeholder.
		let mut buf = [0u8; 8];
		assert_eq!(fs.read(reader, &mut buf).unwrap(), 4);
		assert_eq!(&buf[..4], &[1, 2, 3, 4]);

		fs.close(reader).unwrap();
		let (bytes, n) = detach(&fs, "shared").unwrap();
		assert_eq!(n, 4);
		assert_eq!(bytes, alloc::vec![1, 2, 3, 4]);
	}
}
