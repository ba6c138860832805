//! return-risk - Main Entry Point

use clap::Parser;
use return_risk_cli::{run, Cli};

fn main() -> anyhow::Result<()> {
    run(Cli::parse())
}
