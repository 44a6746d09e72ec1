//! CLI for the uplink upload-link rewriter.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use uplink_core::config;

use commands::{run_classify, run_escape, run_group_path, run_rewrite};

/// Top-level CLI for uplink.
#[derive(Debug, Parser)]
#[command(name = "uplink")]
#[command(
    about = "uplink: rewrite relative upload links into owner-scoped URLs",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Rewrite upload links in a JSON document tree and print the result.
    Rewrite(RewriteArgs),

    /// Show how a link value is classified.
    Classify {
        /// Attribute value (href/src) to classify.
        value: String,
    },

    /// Percent-encode a path the way rewritten links are encoded.
    Escape {
        /// Path to escape, e.g. `/uploads/한글.png`.
        path: String,
    },

    /// Print the full path of a group from a JSON group list.
    GroupPath {
        /// JSON file with `[{"id":1,"path":"group1","parent_id":null}, ...]`.
        groups: PathBuf,
        /// Group identifier.
        id: u64,
    },
}

#[derive(Debug, Args)]
pub struct RewriteArgs {
    /// JSON document tree (`{"nodes":[...]}`).
    pub document: PathBuf,

    /// Full path of the project the document belongs to (takes precedence over groups).
    #[arg(long, value_name = "FULL_PATH")]
    pub project: Option<String>,

    /// Full path of the group the document belongs to.
    #[arg(long, value_name = "FULL_PATH", conflicts_with = "group_id")]
    pub group: Option<String>,

    /// JSON group list used to compute the full path for --group-id.
    #[arg(long, value_name = "FILE", requires = "group_id")]
    pub groups: Option<PathBuf>,

    /// Group identifier looked up in --groups.
    #[arg(long, value_name = "ID", requires = "groups")]
    pub group_id: Option<u64>,

    /// Origin for rewritten links (overrides the configured base_url).
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Print the rewritten tree as JSON instead of HTML.
    #[arg(long)]
    pub json: bool,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Rewrite(args) => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                run_rewrite(&cfg, &args)?;
            }
            CliCommand::Classify { value } => run_classify(&value),
            CliCommand::Escape { path } => run_escape(&path),
            CliCommand::GroupPath { groups, id } => run_group_path(&groups, id)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
