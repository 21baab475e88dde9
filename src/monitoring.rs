//! Process resource monitoring.
//!
//! Samples the CPU and memory use of the server process at a configurable
//! interval via `sysinfo` and appends the readings to a log file, with an
//! optional realtime `tracing` line per interval.

use std::fs::OpenOptions;
use std::io::Write;
use std::time::Duration;
use sysinfo::{Pid, ProcessesToUpdate, System};
use tokio::time;
use tracing::{error, info};

pub struct CpuMonitorConfig {
    /// Logging interval in seconds.
    pub interval_secs: u64,
    /// Stats file path; `None` disables file logging.
    pub log_file_path: Option<String>,
    /// Also emit each reading through `tracing`.
    pub enable_realtime_logging: bool,
}

impl Default for CpuMonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: 120,
            log_file_path: Some("cpu_stats.log".to_string()),
            enable_realtime_logging: false,
        }
    }
}

/// One interval's worth of process statistics.
#[derive(Debug, Clone)]
pub struct CpuStats {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// CPU time consumed by the process during the interval, in seconds.
    pub cpu_time_seconds: f64,
    pub avg_cpu_percentage: f32,
    pub memory_usage_mb: f64,
}

impl CpuStats {
    pub fn format_for_log(&self) -> String {
        format!(
            "[{}] CPU Time Used: {:.3}s | Avg CPU Usage: {:.2}% | Memory: {:.2} MB",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.cpu_time_seconds,
            self.avg_cpu_percentage,
            self.memory_usage_mb
        )
    }
}

/// Background task: one sample per second, one aggregated reading per
/// interval. Spawn it with `tokio::spawn`.
pub async fn start_cpu_monitoring(config: CpuMonitorConfig) {
    info!(
        "Starting process monitoring with interval: {} seconds",
        config.interval_secs
    );

    if let Some(ref path) = config.log_file_path {
        if let Err(e) = initialize_log_file(path, config.interval_secs) {
            error!("Failed to initialize stats log file: {}", e);
        }
    }

    let mut sys = System::new_all();
    let current_pid = Pid::from_u32(std::process::id());

    let mut interval = time::interval(Duration::from_secs(config.interval_secs));
    // The first tick fires immediately; skip it.
    interval.tick().await;

    loop {
        let start_time = std::time::Instant::now();

        let sample_count = config.interval_secs;
        let mut cpu_samples = Vec::with_capacity(sample_count as usize);
        let mut memory_samples = Vec::with_capacity(sample_count as usize);

        for _ in 0..sample_count {
            sys.refresh_processes(ProcessesToUpdate::Some(&[current_pid]), true);
            tokio::time::sleep(Duration::from_millis(200)).await;

            if let Some(process) = sys.process(current_pid) {
                cpu_samples.push(process.cpu_usage());
                memory_samples.push(process.memory() as f64 / (1024.0 * 1024.0));
            }

            tokio::time::sleep(Duration::from_millis(800)).await;
        }

        let elapsed = start_time.elapsed().as_secs_f64();
        let stats = collect_cpu_stats(&cpu_samples, &memory_samples, elapsed);

        if let Some(ref path) = config.log_file_path {
            if let Err(e) = log_to_file(path, &stats) {
                error!("Failed to write stats to file: {}", e);
            }
        }

        if config.enable_realtime_logging {
            info!(
                "Process stats - Time: {:.3}s | Avg Usage: {:.2}% | Memory: {:.2} MB",
                stats.cpu_time_seconds, stats.avg_cpu_percentage, stats.memory_usage_mb
            );
        }

        interval.tick().await;
    }
}

fn collect_cpu_stats(
    cpu_samples: &[f32],
    memory_samples: &[f64],
    elapsed_seconds: f64,
) -> CpuStats {
    let avg_cpu_percentage = if !cpu_samples.is_empty() {
        cpu_samples.iter().sum::<f32>() / cpu_samples.len() as f32
    } else {
        0.0
    };

    let memory_usage_mb = if !memory_samples.is_empty() {
        memory_samples.iter().sum::<f64>() / memory_samples.len() as f64
    } else {
        0.0
    };

    let cpu_time_seconds = (avg_cpu_percentage / 100.0) as f64 * elapsed_seconds;

    CpuStats {
        timestamp: chrono::Utc::now(),
        cpu_time_seconds,
        avg_cpu_percentage,
        memory_usage_mb,
    }
}

/// Truncates and re-headers the stats file on every server start.
fn initialize_log_file(path: &str, interval_secs: u64) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;

    writeln!(file, "=== Process Resource Usage Log ===")?;
    writeln!(
        file,
        "Started: {} (UTC)",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(file, "Logging Interval: {} seconds", interval_secs)?;
    writeln!(file, "==================================\n")?;
    file.flush()?;

    Ok(())
}

fn log_to_file(path: &str, stats: &CpuStats) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    writeln!(file, "{}", stats.format_for_log())?;
    file.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_stats_format() {
        let stats = CpuStats {
            timestamp: chrono::Utc::now(),
            cpu_time_seconds: 2.456,
            avg_cpu_percentage: 2.05,
            memory_usage_mb: 256.78,
        };

        let formatted = stats.format_for_log();
        assert!(formatted.contains("2.456s"));
        assert!(formatted.contains("2.05%"));
        assert!(formatted.contains("256.78 MB"));
    }

    #[test]
    fn test_default_config() {
        let config = CpuMonitorConfig::default();
        assert_eq!(config.interval_secs, 120);
        assert!(!config.enable_realtime_logging);
    }
}
