//! Codes command: prints the mouthpiece button-state table.

use anyhow::Result;
use clap::Args;

use crate::button_state::CANONICAL_TABLE;

/// Print every recognised button-state token
#[derive(Debug, Clone, Args)]
pub struct CodesArgs {}

impl CodesArgs {
    /// Execute the codes command
    pub fn execute(&self) -> Result<()> {
        println!("{:<28} [L, C, R, puff, soft]", "token");
        for (token, vector) in CANONICAL_TABLE {
            println!("{token:<28} {vector}");
        }
        Ok(())
    }
}
