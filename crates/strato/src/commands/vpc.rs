use crate::progress::ConsoleProgress;
use colored::Colorize;
use std::sync::Arc;
use strato_cloud::PollConfig;
use strato_cloud_api::{ApiConfig, DEFAULT_ENDPOINT};
use strato_config::StratoConfig;
use strato_teardown::{Orchestrator, TeardownError, TeardownOptions};

/// 設定ファイルとコマンドライン引数をマージした設定
#[derive(Debug, Clone)]
pub struct Settings {
    pub endpoint: String,
    pub options: TeardownOptions,
}

impl Settings {
    pub fn resolve(
        config: &StratoConfig,
        endpoint: Option<String>,
        poll_timeout: Option<u64>,
        poll_interval: Option<u64>,
        no_verify: bool,
    ) -> anyhow::Result<Self> {
        let merged = StratoConfig {
            endpoint: endpoint.or_else(|| config.endpoint.clone()),
            timeout_secs: poll_timeout.unwrap_or(config.timeout_secs),
            interval_secs: poll_interval.unwrap_or(config.interval_secs),
            verify: config.verify && !no_verify,
        };
        merged.validate()?;

        Ok(Self {
            endpoint: merged
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            options: TeardownOptions {
                poll: PollConfig::new(merged.poll_timeout(), merged.poll_interval()),
                verify: merged.verify,
            },
        })
    }
}

pub async fn handle_teardown(
    settings: Settings,
    vpc_id: &str,
    dry_run: bool,
) -> anyhow::Result<()> {
    let api_config = ApiConfig::from_env(settings.endpoint.as_str())?;
    let services = strato_cloud_api::connect(api_config)?;

    // dry-run では確認プロンプトを出さない
    if dry_run {
        println!(
            "{}",
            format!("Dry run: nothing inside VPC {} will be changed", vpc_id).cyan()
        );
    } else if !strato_teardown::confirm_stdin(vpc_id)? {
        return Err(TeardownError::ConfirmationDeclined {
            vpc_id: vpc_id.to_string(),
        }
        .into());
    }

    tracing::debug!(endpoint = %settings.endpoint, options = ?settings.options, "starting teardown");
    let orchestrator =
        Orchestrator::new(services, settings.options).with_progress(Arc::new(ConsoleProgress));
    let report = orchestrator.run(vpc_id, dry_run).await?;

    if !dry_run && !report.is_success() {
        println!(
            "{}",
            "Some resources could not be removed; re-run the teardown once they are released."
                .yellow()
        );
    }
    Ok(())
}
