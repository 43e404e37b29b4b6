//! Health monitoring command.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use colored::*;
use draftbuddy_core::connection::{ConnectionManager, ConnectionPhase, StatusSink};

use crate::cli::MonitorArgs;
use crate::error::CliError;
use crate::session;

/// Prints connection transitions as they happen.
struct PrintSink {
    ndjson: bool,
    scanning: AtomicBool,
}

impl StatusSink for PrintSink {
    fn on_status(&self, phase: ConnectionPhase, message: &str) {
        // Collapse per-probe scan updates into the first scanning line.
        let was_scanning = self
            .scanning
            .swap(phase == ConnectionPhase::Scanning, Ordering::Relaxed);
        if was_scanning && phase == ConnectionPhase::Scanning {
            return;
        }

        if self.ndjson {
            let output = serde_json::json!({
                "phase": phase.as_str(),
                "message": message,
                "timestamp": Utc::now().to_rfc3339()
            });
            println!("{}", serde_json::to_string(&output).unwrap_or_default());
        } else {
            print_colored_status(phase, message);
        }

        io::stdout().flush().ok();
    }
}

fn print_colored_status(phase: ConnectionPhase, message: &str) {
    let phase_str = format!("{:>12}", phase.as_str());
    let phase_colored = match phase {
        ConnectionPhase::Scanning => phase_str.yellow(),
        ConnectionPhase::Connected => phase_str.green(),
        ConnectionPhase::Disconnected => phase_str.red().bold(),
    };

    let stamp = Utc::now().format("%H:%M:%S").to_string();

    println!("{} {} {}", stamp.dimmed(), phase_colored, message);
}

/// Run the monitor command
pub async fn run_monitor(
    args: MonitorArgs,
    device: Option<String>,
    timeout: u64,
    json: bool,
) -> Result<(), CliError> {
    let ndjson = args.ndjson || json;
    let interval = Duration::from_secs(args.interval.max(1));

    if !ndjson {
        println!("Monitoring frame health every {}s", interval.as_secs());
        println!("Press Ctrl+C to stop.\n");
    }

    let sink = Arc::new(PrintSink {
        ndjson,
        scanning: AtomicBool::new(false),
    });

    let mut config = session::manager_config(timeout);
    config.check_interval = interval;

    let manager = ConnectionManager::with_status(config, sink)?;

    if let Some(addr) = device {
        manager.set_address(&addr).await;
    }

    manager.start_monitoring().await;

    tokio::signal::ctrl_c().await?;

    manager.shutdown().await;

    if !ndjson {
        println!("\nStopped.");
    }

    Ok(())
}
