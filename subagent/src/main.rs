//! `codex-subagent` entry point.
//!
//! Resolves the subagent root (`--root`, `$CODEX_SUBAGENT_ROOT`, then
//! `~/.codex-subagent`), makes sure its directories exist and runs one
//! registry command. Logs go to stderr, filtered by `RUST_LOG`.

use std::io::Read;

use anyhow::{Context, Result};
use clap::Parser;
use codex_subagent::{Registry, SubagentPaths};

mod cli;

use cli::{Cli, Command, ListArgs, ShowArgs, UpsertArgs};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let root = match cli.root {
        Some(root) => root,
        None => SubagentPaths::default_root().context(
            "could not determine home directory; pass --root or set CODEX_SUBAGENT_ROOT",
        )?,
    };

    let paths = SubagentPaths::new(root);
    paths
        .ensure()
        .with_context(|| format!("failed to create {}", paths.root().display()))?;
    tracing::debug!(root = %paths.root().display(), "subagent root ready");

    match cli.cmd {
        Command::Init => {
            println!("{}", paths.state_file().display());
            Ok(())
        }
        Command::List(args) => run_list(&paths, args),
        Command::Show(args) => run_show(&paths, args),
        Command::Upsert(args) => run_upsert(&paths, args),
    }
}

fn run_list(paths: &SubagentPaths, args: ListArgs) -> Result<()> {
    let registry = Registry::open(paths.state_file())?;
    let threads = registry.list_threads();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&threads)?);
        return Ok(());
    }

    for thread in &threads {
        let id = thread
            .get(codex_subagent::registry::THREAD_ID_FIELD)
            .map(json_display)
            .unwrap_or_default();
        let status = thread
            .get("status")
            .map(json_display)
            .unwrap_or_else(|| "-".to_string());
        println!("{id}\t{status}");
    }
    Ok(())
}

fn run_show(paths: &SubagentPaths, args: ShowArgs) -> Result<()> {
    let registry = Registry::open(paths.state_file())?;
    match registry.get(&args.thread_id) {
        Some(thread) => {
            println!("{}", serde_json::to_string_pretty(&thread)?);
            Ok(())
        }
        None => {
            eprintln!("thread not found: {}", args.thread_id);
            std::process::exit(1);
        }
    }
}

fn run_upsert(paths: &SubagentPaths, args: UpsertArgs) -> Result<()> {
    let raw = if args.record == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read thread record from stdin")?;
        buf
    } else {
        args.record
    };
    let value: serde_json::Value =
        serde_json::from_str(&raw).context("thread record is not valid JSON")?;

    let mut registry = Registry::open(paths.state_file())?;
    let thread_id = registry.upsert_value(value)?;
    println!("{thread_id}");
    Ok(())
}

/// Strings print bare; everything else prints as compact JSON.
fn json_display(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
