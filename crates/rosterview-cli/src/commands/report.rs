//! The `registrars` and `events` report commands.

use std::time::Duration;

use rosterview_api::{CancelToken, RosterClient};
use tracing::{debug, warn};

use crate::cli::ReportArgs;
use crate::config::RosterConfig;
use crate::error::CliResult;
use crate::render::{Report, ReportKind};

/// Logs in, fetches the requested range and prints one aggregate.
pub async fn run(kind: ReportKind, args: &ReportArgs, config: &RosterConfig) -> CliResult<()> {
    let api_config = config.to_api_config()?;
    let credentials = config.resolve_credentials()?;

    let (handle, mut cancel) = CancelToken::new();
    if let Some(secs) = args.deadline {
        cancel = cancel.with_timeout(Duration::from_secs(secs));
    }
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, stopping after the current week");
            handle.cancel();
        }
    });

    let mut client = RosterClient::new(api_config, credentials, Some((args.start, args.end)))?
        .with_cancel_token(cancel);
    debug!(range = %client.date_range(), ?kind, "running report");

    let result = render(kind, args.json, &mut client).await;
    client.close().await;

    println!("{}", result?);
    Ok(())
}

async fn render(kind: ReportKind, json: bool, client: &mut RosterClient) -> CliResult<String> {
    client.login().await?;

    let counts = match kind {
        ReportKind::Registrars => client.assemble_registrar_events().await?,
        ReportKind::Events => client.assemble_events_with_registrar_counts().await?,
    };

    let report = Report::new(kind, client.date_range(), &counts);
    if json {
        Ok(report.to_json()?)
    } else {
        Ok(report.to_text().trim_end().to_string())
    }
}
