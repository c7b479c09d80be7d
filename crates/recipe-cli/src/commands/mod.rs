//! Command implementations for recipe-cli

pub mod converge;
pub mod facts;

pub use converge::run_converge;
pub use facts::run_facts;
