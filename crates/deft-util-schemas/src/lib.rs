//! Deserialization schemas for Deft's on-disk manifests, plus the
//! restricted-name grammar shared by package names and dep strings.
//!
//! Kept deliberately thin, the way `cargo-util-schemas` is just the raw
//! `Toml*` deserialize structs with no resolution logic attached: this
//! crate never resolves, installs, or walks a workspace, it only knows the
//! shape of `dylan-package.json` / `workspace.json` and what a valid
//! package name looks like.

pub mod manifest;
pub mod restricted_names;

pub use manifest::{PackageManifestSchema, WorkspaceManifestSchema};
pub use restricted_names::{validate_package_name, NameError};
