//! `ellx-sync scan` — print local fingerprints without contacting any service.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use ellx_sync::scanner;

/// Arguments for `ellx-sync scan`.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Working tree to scan.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Emit the records as a JSON array.
    #[arg(long)]
    pub json: bool,
}

impl ScanArgs {
    pub fn run(self) -> Result<()> {
        let records = scanner::scan(&self.root)
            .with_context(|| format!("failed to scan {}", self.root.display()))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&records).context("failed to serialize records")?
            );
            return Ok(());
        }

        for record in &records {
            println!("{}  {}", record.hash, record.path);
        }
        Ok(())
    }
}
