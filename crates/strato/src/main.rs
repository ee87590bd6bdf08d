mod commands;
mod progress;

use clap::{Parser, Subcommand};
use commands::vpc::Settings;
use strato_config::StratoConfig;
use tracing_subscriber::EnvFilter;

/// RUST_LOG 未指定時のログフィルタ
///
/// 削除処理の進捗と失敗は ConsoleProgress が表示するので、
/// strato_teardown のログは RUST_LOG で明示したときだけ出す
const DEFAULT_LOG_FILTER: &str = "warn,strato_teardown=off";

#[derive(Parser)]
#[command(name = "strato")]
#[command(about = "Command-line client for the Strato cloud control plane", long_about = None)]
struct Cli {
    /// コントロールプレーンのエンドポイント (設定ファイルより優先)
    #[arg(long, global = true, env = "STRATO_ENDPOINT")]
    endpoint: Option<String>,

    /// 1つの操作の完了を待つ最大秒数
    #[arg(long, global = true, value_name = "SECS")]
    poll_timeout: Option<u64>,

    /// 状態確認の間隔 (秒)
    #[arg(long, global = true, value_name = "SECS")]
    poll_interval: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// VPCの管理
    #[command(subcommand)]
    Vpc(VpcCommands),
    /// バージョン情報を表示
    Version,
}

#[derive(Subcommand)]
enum VpcCommands {
    /// VPCとその中のリソースをすべて削除
    Teardown {
        /// VPC ID
        vpc_id: String,
        /// 削除対象を表示するだけで何も変更しない
        #[arg(long)]
        dry_run: bool,
        /// フェーズごとの残存リソース確認をスキップ
        #[arg(long)]
        no_verify: bool,
    },
}

/// RUST_LOG の値からログフィルタを作る（不正な値ならデフォルト）
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ログはstderrへ（stdoutは進捗表示用）
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Version => {
            println!("strato {}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Vpc(VpcCommands::Teardown {
            vpc_id,
            dry_run,
            no_verify,
        }) => {
            let config = StratoConfig::load()?;
            let settings = Settings::resolve(
                &config,
                cli.endpoint,
                cli.poll_timeout,
                cli.poll_interval,
                no_verify,
            )?;
            commands::vpc::handle_teardown(settings, &vpc_id, dry_run).await?;
        }
    }

    Ok(())
}
