use hotclaim::config::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// `console` is off while the terminal status block owns stdout/stderr; file logging
/// still runs when `logging.dir` is set. Keep the returned guard alive for the
/// lifetime of the process or buffered file lines are lost.
pub fn init_logging(config: &LoggingConfig, console: bool) -> Option<WorkerGuard> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives = format!("{},hotclaim=debug,hyper=warn,reqwest=warn", config.level);
        EnvFilter::new(directives)
    });

    let (file_layer, guard) = match config.dir.as_deref().map(open_log_dir) {
        Some(Some((log_dir, writer, guard))) => {
            eprintln!("Logging to: {}/hotclaim.log", log_dir);
            (
                Some(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false)
                        .with_target(true),
                ),
                Some(guard),
            )
        }
        _ => (None, None),
    };

    let console_text = (console && !config.json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
    });
    let console_json = (console && config.json).then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(false)
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_text)
        .with(console_json)
        .with(file_layer)
        .try_init();

    guard
}

// `tracing_appender::rolling::daily` panics if it cannot create the first file,
// so writability is checked up front.
fn open_log_dir(
    log_dir: &str,
) -> Option<(
    String,
    tracing_appender::non_blocking::NonBlocking,
    WorkerGuard,
)> {
    if let Err(e) = std::fs::create_dir_all(log_dir) {
        eprintln!(
            "Warning: Could not create log directory {} ({}), file logging disabled",
            log_dir, e
        );
        return None;
    }

    let test_path = std::path::Path::new(log_dir).join(".hotclaim_write_test");
    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&test_path)
    {
        Ok(_) => {
            let _ = std::fs::remove_file(&test_path);
            let file_appender = tracing_appender::rolling::daily(log_dir, "hotclaim.log");
            let (writer, guard) = tracing_appender::non_blocking(file_appender);
            Some((log_dir.to_string(), writer, guard))
        }
        Err(e) => {
            eprintln!(
                "Warning: Could not write to log directory {} ({}), file logging disabled",
                log_dir, e
            );
            None
        }
    }
}
