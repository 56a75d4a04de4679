// src/utils/logging.rs
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Installs the global subscriber: human-readable output on stdout plus a
/// daily-rolling non-blocking log file. The returned guard must be held
/// for the life of the process or buffered lines are lost.
pub fn init(log_dir: &str) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(log_dir, "paperpilot.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking.and(std::io::stdout))
        .with_ansi(false)
        .with_target(false)
        .init();

    guard
}
