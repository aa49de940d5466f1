//! CLI command definitions and dispatch.

pub mod replay;
pub mod snapshot;
pub mod tail;
pub mod watch;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use vmdash_common::config::DashConfig;
use vmdash_common::constants::{EVENT_ENV, URL_ENV};
use vmdash_common::types::MalformedPolicy;

/// vmdash — Live CPU and memory dashboard for virtual machines.
#[derive(Parser, Debug)]
#[command(name = "vmdash", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options shared by every subcommand. Each one overrides the matching
/// field of the configuration file.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Path to a JSON configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the metrics producer.
    #[arg(long, global = true, env = URL_ENV)]
    pub url: Option<String>,

    /// Event name carrying metrics batches.
    #[arg(long, global = true, env = EVENT_ENV)]
    pub event: Option<String>,

    /// Handling of malformed samples: abort or skip.
    #[arg(long, global = true)]
    pub policy: Option<MalformedPolicy>,

    /// Accept self-signed TLS certificates.
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Write logs to this file instead of stderr.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

impl GlobalArgs {
    /// Loads the configuration file, if any, and applies overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded or the result is
    /// invalid.
    pub fn resolve(&self) -> anyhow::Result<DashConfig> {
        let mut config = match &self.config {
            Some(path) => DashConfig::load(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => DashConfig::default(),
        };
        if let Some(url) = &self.url {
            config.base_url.clone_from(url);
        }
        if let Some(event) = &self.event {
            config.event_name.clone_from(event);
        }
        if let Some(policy) = self.policy {
            config.malformed_policy = policy;
        }
        if self.insecure {
            config.insecure_tls = true;
        }
        config.validate()?;
        tracing::debug!(?config, "configuration resolved");
        Ok(config)
    }
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open the full-screen dashboard.
    Watch(watch::WatchArgs),
    /// Print every batch as a plain table until Ctrl+C.
    Tail(tail::TailArgs),
    /// Fetch the current batch once and print it.
    Snapshot(snapshot::SnapshotArgs),
    /// Render a recorded event stream.
    Replay(replay::ReplayArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = cli.global.resolve()?;
    match cli.command {
        Command::Watch(args) => watch::execute(args, config),
        Command::Tail(args) => tail::execute(args, config),
        Command::Snapshot(args) => snapshot::execute(args, &config),
        Command::Replay(args) => replay::execute(args, &config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_file_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("vmdash.json");
        std::fs::write(&path, r#"{"base_url": "http://file:5000", "event_name": "update_vms"}"#)
            .expect("write");

        let args = GlobalArgs {
            config: Some(path),
            url: Some("https://override:6443".into()),
            policy: Some(MalformedPolicy::Skip),
            insecure: true,
            ..GlobalArgs::default()
        };
        let config = args.resolve().expect("resolve");
        assert_eq!(config.base_url, "https://override:6443");
        assert_eq!(config.event_name, "update_vms");
        assert_eq!(config.malformed_policy, MalformedPolicy::Skip);
        assert!(config.insecure_tls);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let args = GlobalArgs {
            event: Some(String::new()),
            ..GlobalArgs::default()
        };
        assert!(args.resolve().is_err());
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "vmdash",
            "tail",
            "--url",
            "http://producer:5000",
            "--policy",
            "skip",
        ])
        .expect("parse");
        assert!(matches!(cli.command, Command::Tail(_)));
        assert_eq!(cli.global.url.as_deref(), Some("http://producer:5000"));
        assert_eq!(cli.global.policy, Some(MalformedPolicy::Skip));
    }
}
