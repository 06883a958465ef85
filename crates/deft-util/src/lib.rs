//! Miscellaneous filesystem support code used by Deft.
//!
//! Mirrors the narrow slice of `cargo-util`'s `paths` module that the
//! release store and registry generator actually need: idempotent
//! directory creation, an atomic "populate a temp dir then rename into
//! place" primitive, and a read-if-exists helper for write-on-diff
//! registry entries.

pub mod paths;

pub use paths::{atomic_install, is_nonempty_dir, read_if_exists, write_if_different};
