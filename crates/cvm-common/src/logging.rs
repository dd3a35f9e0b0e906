use std::any::Any;
use std::panic;
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Logging knobs read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `CVM_LOG_DIR`: daily rotated files instead of stdout
    pub dir: Option<PathBuf>,
    /// `CVM_LOG_INCLUDE_BACKTRACE`: also run the default panic hook
    pub include_backtrace: bool,
    /// Filter used when `RUST_LOG` is unset
    pub default_filter: String,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self {
            dir: std::env::var_os("CVM_LOG_DIR")
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from),
            include_backtrace: std::env::var("CVM_LOG_INCLUDE_BACKTRACE")
                .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            default_filter: std::env::var("CVM_LOG_LEVEL").unwrap_or_else(|_| "info".into()),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panic payload not string".into())
}

/// Route panics through `tracing` with thread and location. Installed once
/// per process; later calls are no-ops.
pub fn install_tracing_panic_hook(app_name: &'static str) {
    static INSTALLED: OnceLock<()> = OnceLock::new();

    INSTALLED.get_or_init(|| {
        let default_hook = panic::take_hook();
        let include_backtrace = LoggingConfig::from_env().include_backtrace;

        panic::set_hook(Box::new(move |info| {
            let thread = std::thread::current();
            let thread_name = thread.name().unwrap_or("unknown");
            let location = info
                .location()
                .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()));

            tracing::error!(
                application = app_name,
                %thread_name,
                location = location.as_deref().unwrap_or("unknown"),
                panic_message = %panic_message(info.payload()),
                "panic captured"
            );

            if include_backtrace {
                default_hook(info);
            }
        }));
    });
}

fn rotating_file_writer(app_name: &'static str, dir: PathBuf) -> Option<BoxMakeWriter> {
    if let Err(err) = std::fs::create_dir_all(&dir) {
        tracing::warn!(error = %err, "failed to create CVM_LOG_DIR; falling back to stdout");
        return None;
    }

    let appender = tracing_appender::rolling::daily(dir, format!("{app_name}.log"));
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    Some(BoxMakeWriter::new(non_blocking))
}

/// Initialize the global subscriber. `RUST_LOG` wins over `CVM_LOG_LEVEL`;
/// with `CVM_LOG_DIR` set, output goes to `<dir>/<app>.log` rotated daily.
pub fn init_tracing_subscriber(app_name: &'static str) {
    let config = LoggingConfig::from_env();
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);

    match config.dir.and_then(|dir| rotating_file_writer(app_name, dir)) {
        Some(writer) => {
            let _ = builder.with_writer(writer).with_ansi(false).try_init();
        }
        None => {
            let _ = builder.try_init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::with_env;

    #[test]
    fn reads_logging_env() {
        with_env(
            &[
                ("CVM_LOG_DIR", Some("/tmp/cvm-logs")),
                ("CVM_LOG_INCLUDE_BACKTRACE", Some("TRUE")),
                ("CVM_LOG_LEVEL", Some("debug")),
            ],
            || {
                let cfg = LoggingConfig::from_env();

                assert_eq!(cfg.dir, Some(PathBuf::from("/tmp/cvm-logs")));
                assert!(cfg.include_backtrace);
                assert_eq!(cfg.default_filter, "debug");
            },
        );
    }

    #[test]
    fn empty_log_dir_means_stdout() {
        with_env(
            &[("CVM_LOG_DIR", Some("")), ("CVM_LOG_INCLUDE_BACKTRACE", None)],
            || {
                let cfg = LoggingConfig::from_env();

                assert_eq!(cfg.dir, None);
                assert!(!cfg.include_backtrace);
            },
        );
    }

    #[test]
    fn panic_payloads_become_messages() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("boom"));
        let borrowed: Box<dyn Any + Send> = Box::new("bang");
        let other: Box<dyn Any + Send> = Box::new(7_u8);

        assert_eq!(panic_message(owned.as_ref()), "boom");
        assert_eq!(panic_message(borrowed.as_ref()), "bang");
        assert_eq!(panic_message(other.as_ref()), "panic payload not string");
    }
}
