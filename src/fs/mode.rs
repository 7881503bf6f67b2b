// SPDX-License-Identifier: GPL-2.0

//! File mode bits reported by `stat`/`fstat` — Linux-compatible subset.

/// File type mask.
pub const S_IFMT: u32 = 0o170000;
/// Regular file.
pub const S_IFREG: u32 = 0o100000;
/// Directory.
pub const S_IFDIR: u32 = 0o040000;

/// Read by owner/group/other.
pub const S_IRUSR: u32 = 0o000400;
pub const S_IRGRP: u32 = 0o000040;
pub const S_IROTH: u32 = 0o000004;
/// Write by owner/group/other.
pub const S_IWUSR: u32 = 0o000200;
pub const S_IWGRP: u32 = 0o000020;
pub const S_IWOTH: u32 = 0o000002;
/// Execute by owner/group/other.
pub const S_IXUSR: u32 = 0o000100;
pub const S_IXGRP: u32 = 0o000010;
pub const S_IXOTH: u32 = 0o000001;

/// Fixed permission bits `stat` reports: read/write for all, execute for
/// directories only. There is no access-control enforcement beyond
/// reporting these bits.
pub const RW_ALL: u32 = S_IRUSR | S_IWUSR | S_IRGRP | S_IWGRP | S_IROTH | S_IWOTH;
pub const X_ALL: u32 = S_IXUSR | S_IXGRP | S_IXOTH;

pub fn s_isreg(mode: u32) -> bool {
	(mode & S_IFMT) == S_IFREG
}

pub fn s_isdir(mode: u32) -> bool {
	(mode & S_IFMT) == S_IFDIR
}
