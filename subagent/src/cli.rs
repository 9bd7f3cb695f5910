use std::path::PathBuf;

use clap::Parser;

/// Inspect and update the subagent thread registry.
#[derive(Debug, Parser)]
#[command(name = "codex-subagent", version)]
pub struct Cli {
    /// Subagent root directory (defaults to `~/.codex-subagent`).
    #[arg(long, global = true, env = codex_subagent::ROOT_ENV_VAR, value_name = "DIR")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Create the root, `state/` and `logs/` directories.
    Init,

    /// List every registered thread.
    List(ListArgs),

    /// Print one thread record as JSON.
    Show(ShowArgs),

    /// Insert or replace a thread record.
    Upsert(UpsertArgs),
}

#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Print the records as a JSON array.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct ShowArgs {
    pub thread_id: String,
}

#[derive(Debug, Parser)]
pub struct UpsertArgs {
    /// Thread record as a JSON object, or `-` to read it from stdin.
    #[arg(value_name = "JSON")]
    pub record: String,
}
