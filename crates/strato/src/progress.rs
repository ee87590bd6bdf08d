use colored::Colorize;
use strato_teardown::{ProgressEvent, ProgressSink};

/// 削除の進捗をターミナルに表示
pub struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn emit(&self, event: ProgressEvent) {
        let line = event.to_string();
        match event {
            ProgressEvent::PhaseStarted { .. } => {
                println!();
                println!("{}", format!("■ {}", line).bold());
            }
            ProgressEvent::Executing(_) => println!("  → {}", line),
            ProgressEvent::Previewed(_) => println!("  {}", line.cyan()),
            ProgressEvent::ItemFailed { .. } => eprintln!("  {} {}", "✗".red(), line.red()),
            ProgressEvent::Leftovers { .. } | ProgressEvent::VerificationSkipped { .. } => {
                println!("  {} {}", "⚠".yellow(), line.yellow())
            }
            ProgressEvent::ContainerAlreadyDeleted { .. } => println!("  ℹ {}", line),
            ProgressEvent::Finished { summary, .. } => {
                println!();
                if summary.failed == 0 && summary.leftovers == 0 {
                    println!("{}", line.green().bold());
                } else {
                    println!("{}", line.yellow().bold());
                }
            }
        }
    }
}
