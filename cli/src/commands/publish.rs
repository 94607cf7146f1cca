//! `reelbatch publish`: standalone publish of a produced archive.

use std::path::Path;
use std::process::ExitCode;

use log::error;
use reelbatch::{publish_archive, Credentials, PublishReport, SinkSet};

pub async fn run(config_path: Option<&Path>, archive: &Path) -> ExitCode {
    let report = match execute(config_path, archive).await {
        Ok(report) => report,
        Err(e) => {
            error!("Publish failed: {:#}", e);
            PublishReport {
                published: 0,
                failed: 0,
                errors: vec![format!("{:#}", e)],
            }
        }
    };

    println!(
        "{}",
        serde_json::to_string(&report).unwrap_or_else(|_| "{}".to_string())
    );

    if report.errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn execute(config_path: Option<&Path>, archive: &Path) -> anyhow::Result<PublishReport> {
    let config = super::load_config(config_path)?;
    let credentials = Credentials::resolve(&config);
    let sinks = SinkSet::from_config(&config.publish, &credentials);
    Ok(publish_archive(archive, &sinks).await?)
}
