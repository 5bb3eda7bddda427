//! Command-line arguments

use clap::{Args, Parser, Subcommand};
use rw_core::analytics::SummaryFormat;
use rw_core::mapper::DEFAULT_SCORE_THRESHOLD;

#[derive(Debug, Parser)]
#[command(name = "rw-systest", about = "Drive RunSessions against the workspace platform API")]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct ConnectionArgs {
    /// Platform API base URL
    #[arg(long, global = true, env = "RW_API_URL")]
    pub api_url: Option<String>,

    /// Workspace name
    #[arg(long, global = true, env = "RW_WORKSPACE")]
    pub workspace: Option<String>,

    /// Bearer token for the platform API
    #[arg(long, global = true, env = "RW_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

#[derive(Debug, Args)]
pub struct PollArgs {
    /// Seconds between polls
    #[arg(long, default_value_t = 5.0)]
    pub poll_interval: f64,

    /// Seconds before giving up
    #[arg(long, default_value_t = 300.0)]
    pub max_wait: f64,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search for tasks and start a RunSession from the hits
    SearchAndRun {
        #[arg(long)]
        query: String,

        /// Persona short name the session runs as
        #[arg(long)]
        persona: String,

        #[arg(long, default_value_t = DEFAULT_SCORE_THRESHOLD)]
        score_threshold: f64,

        /// Wait for the new session to stabilize and print a report
        #[arg(long)]
        wait: bool,

        #[command(flatten)]
        poll: PollArgs,
    },

    /// Wait for an existing RunSession to stabilize
    Wait {
        #[arg(long)]
        session_id: i64,

        #[command(flatten)]
        poll: PollArgs,
    },

    /// Print issue and participant analytics for a RunSession
    Report {
        #[arg(long)]
        session_id: i64,

        /// text or markdown
        #[arg(long, default_value = "text", value_parser = parse_format)]
        format: SummaryFormat,
    },

    /// List SLX names carrying a tag, given as name=value
    Slxs {
        #[arg(long, value_parser = parse_tag)]
        tag: TagFilter,
    },

    /// Show the workspace index status
    IndexStatus,

    /// Print the workspace configuration
    WorkspaceConfig,
}

fn parse_format(raw: &str) -> Result<SummaryFormat, String> {
    raw.parse().map_err(|e: rw_core::Error| e.to_string())
}

/// An SLX tag pair to filter on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFilter {
    pub name: String,
    pub value: String,
}

fn parse_tag(raw: &str) -> Result<TagFilter, String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok(TagFilter {
            name: name.to_string(),
            value: value.to_string(),
        }),
        _ => Err(format!("expected name=value, got '{}'", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tag() {
        let tag = parse_tag("team=payments").unwrap();
        assert_eq!(tag.name, "team");
        assert_eq!(tag.value, "payments");

        let tag = parse_tag("url=a=b").unwrap();
        assert_eq!(tag.name, "url");
        assert_eq!(tag.value, "a=b");
        assert!(parse_tag("=x").is_err());
        assert!(parse_tag("novalue").is_err());
    }

    #[test]
    fn test_parse_report_command() {
        let cli = Cli::try_parse_from([
            "rw-systest",
            "report",
            "--session-id",
            "42",
            "--format",
            "markdown",
            "--workspace",
            "t-sandbox",
        ])
        .unwrap();

        assert_eq!(cli.connection.workspace.as_deref(), Some("t-sandbox"));
        match cli.command {
            Command::Report { session_id, format } => {
                assert_eq!(session_id, 42);
                assert_eq!(format, SummaryFormat::Markdown);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
