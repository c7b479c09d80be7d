//! Shared test utilities for the recipespec workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`cookbook`]: [`TestCookbook`] sandbox with cookbooks and pre-existing files
//! - [`ownership`]: ownership snapshots taken around a converge

pub mod cookbook;
pub mod ownership;

pub use cookbook::TestCookbook;
pub use ownership::OwnershipSnapshot;
