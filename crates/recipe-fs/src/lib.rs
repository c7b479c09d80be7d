//! Filesystem collaborator for recipespec
//!
//! Provides root-relative path resolution, atomic I/O, checksums,
//! format-agnostic config loading and ownership snapshots. Nothing in this
//! crate knows about resources or ledgers; the real-execution providers and
//! the content matchers call into it.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;
pub mod ownership;
pub mod path;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use ownership::{Ownership, owner_and_group};
pub use path::NormalizedPath;
