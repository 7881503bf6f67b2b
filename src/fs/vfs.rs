// SPDX-License-Identifier: GPL-2.0

//! The VFS operation table and mount lifecycle: the function pointers a
//! host VFS registry would hold to reach this engine, and the idempotent
//! `init`/`shutdown` pair that owns the process-wide singleton engine
//! instance.

use alloc::vec::Vec;

use log::info;

use crate::error::{Error, Result};
use crate::fs::attach;
use crate::fs::engine::{DirEntry, RamFs, Stat};
use crate::fs::flags::{FcntlCmd, OpenFlags, Whence};
use crate::sync::Mutex;

/// Mount name this engine registers under.
pub const MOUNT_NAME: &str = "/ram";

static ENGINE: Mutex<Option<RamFs>> = Mutex::new(None);

fn with_engine<R>(f: impl FnOnce(&RamFs) -> Result<R>) -> Result<R> {
	let guard = ENGINE.lock();
	match guard.as_ref() {
		Some(fs) => f(fs),
		// Calling through the table before `init()` (or after `shutdown()`)
		// is a host bug, not a filesystem condition the error type covers;
		// `NotFound` is the closest available variant.
		None => Err(Error::NotFound),
	}
}

/// Initialize the singleton engine. Idempotent: allocates the root
/// directory and the handle table, then registers [`OPERATIONS`] under
/// [`MOUNT_NAME`]. A second call with the root already allocated is a
/// no-op.
pub fn init() {
	let mut guard = ENGINE.lock();
	if guard.is_some() {
		return;
	}
	*guard = Some(RamFs::new());
	info!("ramfs: mounted at {}", MOUNT_NAME);
}

/// Tear down the singleton engine, freeing every node (all children sit
/// directly under the root, since `mkdir` is not implemented) and
/// deregistering from the VFS. A no-op if the engine was never
/// initialized.
pub fn shutdown() {
	let mut guard = ENGINE.lock();
	if guard.take().is_some() {
		info!("ramfs: unmounted from {}", MOUNT_NAME);
	}
}

fn vfs_open(path: &str, flags: OpenFlags) -> Result<usize> {
	with_engine(|fs| fs.open(path, flags))
}

fn vfs_close(handle: usize) -> Result<()> {
	with_engine(|fs| fs.close(handle))
}

fn vfs_read(handle: usize, buf: &mut [u8]) -> Result<usize> {
	with_engine(|fs| fs.read(handle, buf))
}

fn vfs_write(handle: usize, buf: &[u8]) -> Result<usize> {
	with_engine(|fs| fs.write(handle, buf))
}

fn vfs_seek(handle: usize, offset: i64, whence: Whence) -> Result<usize> {
	with_engine(|fs| fs.seek(handle, offset, whence))
}

fn vfs_tell(handle: usize) -> Result<usize> {
	with_engine(|fs| fs.tell(handle))
}

fn vfs_total(handle: usize) -> Result<usize> {
	with_engine(|fs| fs.total(handle))
}

fn vfs_readdir(handle: usize) -> Result<DirEntry> {
	with_engine(|fs| fs.readdir(handle))
}

fn vfs_rewinddir(handle: usize) -> Result<()> {
	with_engine(|fs| fs.rewinddir(handle))
}

fn vfs_stat(path: &str) -> Result<Stat> {
	with_engine(|fs| fs.stat(path))
}

fn vfs_fstat(handle: usize) -> Result<Stat> {
	with_engine(|fs| fs.fstat(handle))
}

fn vfs_unlink(path: &str) -> Result<()> {
	with_engine(|fs| fs.unlink(path))
}

fn vfs_mmap(handle: usize) -> Result<(*const u8, usize)> {
	with_engine(|fs| fs.mmap(handle))
}

fn vfs_fcntl(handle: usize, cmd: FcntlCmd) -> Result<u32> {
	with_engine(|fs| fs.fcntl(handle, cmd))
}

fn vfs_attach(path: &str, buffer: Vec<u8>) -> Result<()> {
	with_engine(|fs| attach::attach(fs, path, buffer))
}

fn vfs_detach(path: &str) -> Result<(Vec<u8>, usize)> {
	with_engine(|fs| attach::detach(fs, path))
}

/// The operation table: one function-pointer field per named VFS
/// operation. Unsupported slots are `None` and never populated — this
/// crate declares no `ioctl`, `rename`, `complete`, `mkdir`, `rmdir`,
/// `poll`, `link`, `symlink`, `seek64`, `tell64`, `total64`, or
/// `readlink`.
pub struct OperationTable {
	pub open: Option<fn(&str, OpenFlags) -> Result<usize>>,
	pub close: Option<fn(usize) -> Result<()>>,
	pub read: Option<fn(usize, &mut [u8]) -> Result<usize>>,
	pub write: Option<fn(usize, &[u8]) -> Result<usize>>,
	pub seek: Option<fn(usize, i64, Whence) -> Result<usize>>,
	pub tell: Option<fn(usize) -> Result<usize>>,
	pub total: Option<fn(usize) -> Result<usize>>,
	pub readdir: Option<fn(usize) -> Result<DirEntry>>,
	pub rewinddir: Option<fn(usize) -> Result<()>>,
	pub stat: Option<fn(&str) -> Result<Stat>>,
	pub fstat: Option<fn(usize) -> Result<Stat>>,
	pub unlink: Option<fn(&str) -> Result<()>>,
	pub mmap: Option<fn(usize) -> Result<(*const u8, usize)>>,
	pub fcntl: Option<fn(usize, FcntlCmd) -> Result<u32>>,
	pub attach: Option<fn(&str, Vec<u8>) -> Result<()>>,
	pub detach: Option<fn(&str) -> Result<(Vec<u8>, usize)>>,

	// Unsupported operations — declared and left null.
	pub ioctl: Option<fn()>,
	pub rename: Option<fn()>,
	pub complete: Option<fn()>,
	pub mkdir: Option<fn()>,
	pub rmdir: Option<fn()>,
	pub poll: Option<fn()>,
	pub link: Option<fn()>,
	pub symlink: Option<fn()>,
	pub seek64: Option<fn()>,
	pub tell64: Option<fn()>,
	pub total64: Option<fn()>,
	pub readlink: Option<fn()>,
}

/// The table this crate registers under [`MOUNT_NAME`].
pub static OPERATIONS: OperationTable = OperationTable {
	open: Some(vfs_open),
	close: Some(vfs_close),
	read: Some(vfs_read),
	write: Some(vfs_write),
	seek: Some(vfs_seek),
	tell: Some(vfs_tell),
	total: Some(vfs_total),
	readdir: Some(vfs_readdir),
	rewinddir: Some(vfs_rewinddir),
	stat: Some(vfs_stat),
	fstat: Some(vfs_fstat),
	unlink: Some(vfs_unlink),
	mmap: Some(vfs_mmap),
	fcntl: Some(vfs_fcntl),
	attach: Some(vfs_attach),
	detach: Some(vfs_detach),

	ioctl: None,
	rename: None,
	complete: None,
	mkdir: None,
	rmdir: None,
	poll: None,
	link: None,
	symlink: None,
	seek64: None,
	tell64: None,
	total64: None,
	readlink: None,
};

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fs::flags::{AccessMode, OpenAux};

	// A single test: the singleton is process-wide, and cargo test runs
	// test functions concurrently by default, so splitting this across
	// multiple #[test] fns would race on shared engine state.
	#[test]
	fn singleton_lifecycle_and_table_dispatch() {
		shutdown();
		let flags = OpenFlags::new(AccessMode::WriteOnly, OpenAux::empty());
		assert_eq!((OPERATIONS.open.unwrap())("x", flags).unwrap_err(), Error::NotFound);

		init();
		init(); // idempotent

		let h = (OPERATIONS.open.unwrap())("greeting", flags).unwrap();
		(OPERATIONS.write.unwrap())(h, b"hi").unwrap();
		(OPERATIONS.close.unwrap())(h).unwrap();

		let st = (OPERATIONS.stat.unwrap())("greeting").unwrap();
		assert_eq!(st.size, crate::fs::engine::INITIAL_FILE_CAPACITY as i64);

		shutdown();
		assert_eq!((OPERATIONS.open.unwrap())("y", flags).unwrap_err(), Error::NotFound);
	}
}
