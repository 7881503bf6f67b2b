// SPDX-License-Identifier: GPL-2.0

//! Synchronization primitives

/// The engine mutex: the single lock serializing all filesystem state
/// mutation. Re-exported rather than reimplemented — the host kernel's
/// own mutex primitive is out of scope for this crate, but a working one
/// is needed to exercise the engine under `cargo test`, so we reuse
/// `spin`, the same crate a surrounding kernel would depend on.
pub use spin::Mutex;
pub use spin::MutexGuard;
