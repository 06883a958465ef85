//! The registry generator: scans package directories for `.lid` files and
//! writes the pointer files the downstream compiler reads.

pub mod generator;
pub mod lid;

pub use generator::{generate, GeneratedRegistry};
pub use lid::{Lid, LidParseError};
