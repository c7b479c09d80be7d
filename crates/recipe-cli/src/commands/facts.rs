//! Facts command implementation

use recipe_core::simulated_facts;

use crate::error::Result;

/// Print the simulated system facts every node starts with.
pub fn run_facts() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&simulated_facts())?);
    Ok(())
}
