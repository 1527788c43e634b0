use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::CommandFactory;
use tracing::{info, warn};

use crate::cli::{Cli, MonitorArgs};
use crate::model::{PipelineAlert, PipelineMetrics};
use crate::monitor::PipelineMonitor;
use crate::util::write_json_pretty;

const POLL_INTERVAL: Duration = Duration::from_secs(30);

pub fn run(args: MonitorArgs) -> Result<ExitCode> {
    if args.start_monitoring {
        return monitoring_loop(args.output_file.as_deref());
    }

    if !args.check_status && !args.get_metrics && !args.check_alerts {
        let mut command = Cli::command();
        let monitor = command
            .find_subcommand_mut("monitor")
            .context("monitor subcommand is registered")?;
        monitor.print_help().context("failed to print help")?;
        return Ok(ExitCode::SUCCESS);
    }

    let mut monitor = PipelineMonitor::new();
    let mut output = io::BufWriter::new(io::stdout().lock());

    if args.check_status {
        print_status(&mut output, &monitor)?;
    }

    if args.get_metrics {
        let metrics = monitor.collect_metrics();
        print_metrics(&mut output, &metrics)?;
        if let Some(path) = &args.output_file {
            write_json_pretty(path, &metrics)?;
            info!(path = %path.display(), "metrics saved");
        }
    }

    if args.check_alerts {
        let metrics = monitor.collect_metrics();
        let alerts = monitor.evaluate_alerts(&metrics);
        print_alerts(&mut output, &alerts)?;
        if let Some(path) = &args.output_file {
            write_json_pretty(path, &alerts)?;
            info!(path = %path.display(), "alerts saved");
        }
    }

    writeln!(output)?;
    writeln!(output, "Monitoring operations completed")?;
    output.flush()?;

    Ok(ExitCode::SUCCESS)
}

fn print_status(output: &mut impl Write, monitor: &PipelineMonitor) -> Result<()> {
    let config = monitor.get_monitoring_config();
    let tracked = config.metrics.values().filter(|enabled| **enabled).count();

    writeln!(output, "Pipeline Monitoring Status:")?;
    writeln!(
        output,
        "Enabled: {}",
        if config.enabled { "yes" } else { "no" }
    )?;
    writeln!(output, "Tracked Metrics: {tracked}")?;
    writeln!(output, "Retention: {} days", config.retention_days)?;
    Ok(())
}

fn print_metrics(output: &mut impl Write, metrics: &PipelineMetrics) -> Result<()> {
    writeln!(output, "Pipeline Metrics ({}):", metrics.timestamp)?;
    writeln!(output, "Execution Time: {:.1}s", metrics.execution_time)?;
    writeln!(output, "Success Rate: {:.2}%", metrics.success_rate * 100.0)?;
    writeln!(output, "Failure Rate: {:.2}%", metrics.failure_rate * 100.0)?;
    writeln!(output, "Coverage: {:.1}%", metrics.coverage)?;
    writeln!(output, "Security Score: {:.1}", metrics.security_score)?;
    writeln!(output, "Performance Score: {:.1}", metrics.performance_score)?;
    Ok(())
}

fn print_alerts(output: &mut impl Write, alerts: &[PipelineAlert]) -> Result<()> {
    if alerts.is_empty() {
        writeln!(output, "No alerts found")?;
        return Ok(());
    }

    writeln!(output, "Active Alerts:")?;
    for alert in alerts {
        writeln!(
            output,
            "[{}] {}: {}",
            alert.severity.as_str(),
            alert.alert_type,
            alert.message
        )?;
    }
    Ok(())
}

fn monitoring_loop(output_file: Option<&Path>) -> Result<ExitCode> {
    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = Arc::clone(&running);
    ctrlc::set_handler(move || {
        handler_flag.store(false, Ordering::SeqCst);
    })
    .context("failed to install interrupt handler")?;

    let mut monitor = PipelineMonitor::new();
    info!("continuous pipeline monitoring started");

    while running.load(Ordering::SeqCst) {
        let metrics = monitor.collect_metrics();
        let alerts = monitor.check_alerts();

        if alerts.is_empty() {
            info!(
                success_rate = metrics.success_rate,
                failure_rate = metrics.failure_rate,
                "pipeline healthy"
            );
        } else {
            for alert in &alerts {
                warn!(
                    severity = alert.severity.as_str(),
                    alert_type = %alert.alert_type,
                    message = %alert.message,
                    "pipeline alert raised"
                );
            }
        }

        if let Some(path) = output_file {
            write_json_pretty(path, &metrics)?;
        }

        sleep_interruptible(POLL_INTERVAL, &running);
    }

    let mut output = io::BufWriter::new(io::stdout().lock());
    writeln!(output, "Monitoring stopped")?;
    output.flush()?;

    Ok(ExitCode::SUCCESS)
}

// Sliced sleep so an interrupt is noticed within a quarter second.
fn sleep_interruptible(total: Duration, running: &AtomicBool) {
    let slice = Duration::from_millis(250);
    let mut remaining = total;
    while running.load(Ordering::SeqCst) && !remaining.is_zero() {
        let step = remaining.min(slice);
        std::thread::sleep(step);
        remaining = remaining.saturating_sub(step);
    }
}
