//! rw-systest: command-line driver for the RunSession client
//!
//! Connection settings come from flags or the `RW_API_URL`, `RW_WORKSPACE`
//! and `RW_API_KEY` environment variables.

mod cli;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use platform_client::{
    PlatformClient, PlatformConfig, PollSettings, StabilizationPoller, ENV_API_KEY, ENV_API_URL,
    ENV_WORKSPACE,
};
use rw_core::analytics::SummaryFormat;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command, ConnectionArgs, PollArgs};
use crate::report::render_report;

fn build_config(args: &ConnectionArgs) -> Result<PlatformConfig> {
    let config = PlatformConfig::from_lookup(|name| match name {
        ENV_API_URL => args.api_url.clone(),
        ENV_WORKSPACE => args.workspace.clone(),
        ENV_API_KEY => args.api_key.clone(),
        _ => None,
    })?;
    Ok(config)
}

/// Poller that stops when the user presses Ctrl-C
fn build_poller(poll: &PollArgs) -> Result<StabilizationPoller> {
    let settings = PollSettings::from_secs_f64(poll.poll_interval, poll.max_wait)?;
    let token = CancellationToken::new();

    let on_signal = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, cancelling poll");
            on_signal.cancel();
        }
    });

    Ok(StabilizationPoller::new(settings)?.with_cancellation(token))
}

async fn wait_and_report(
    client: &PlatformClient,
    poll: &PollArgs,
    session_id: i64,
    format: SummaryFormat,
) -> Result<()> {
    let session = build_poller(poll)?
        .wait_until_stable(client, session_id)
        .await?;
    println!("{}", render_report(&session, format)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "platform_client=info,rw_systest=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let client = PlatformClient::new(build_config(&cli.connection)?);
    tracing::info!("Using workspace {}", client.config().workspace);

    match cli.command {
        Command::SearchAndRun {
            query,
            persona,
            score_threshold,
            wait,
            poll,
        } => {
            let Some(created) = client
                .create_runsession_from_query(&query, &persona, score_threshold)
                .await?
            else {
                println!("No tasks matched '{}', nothing to run", query);
                return Ok(());
            };
            println!("{}", serde_json::to_string_pretty(&created)?);

            if wait {
                let session_id = created
                    .get("id")
                    .and_then(|v| v.as_i64())
                    .context("created RunSession has no numeric id")?;
                wait_and_report(&client, &poll, session_id, SummaryFormat::Text).await?;
            }
        }
        Command::Wait { session_id, poll } => {
            wait_and_report(&client, &poll, session_id, SummaryFormat::Text).await?;
        }
        Command::Report { session_id, format } => {
            let session = client.fetch_runsession(session_id).await?;
            println!("{}", render_report(&session, format)?);
        }
        Command::Slxs { tag } => {
            for name in client.slx_names_with_tag(&tag.name, &tag.value).await {
                println!("{}", name);
            }
        }
        Command::IndexStatus => {
            let status = client.index_status().await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Command::WorkspaceConfig => {
            let config = client.workspace_config().await?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
