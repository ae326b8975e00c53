//! Logging for pipeline runs.
//!
//! Logs go to stderr through `tracing`; stdout is reserved for the rendered
//! matrix. The `log_*` helpers keep call sites short and tag each event with
//! a marker so the console output reads like a progress report.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Console verbosity selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

impl Verbosity {
    fn level(self) -> Level {
        match self {
            Self::Quiet => Level::WARN,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
        }
    }
}

/// Install the global stderr subscriber.
///
/// `RUST_LOG` takes precedence over `verbosity`. Calling this more than
/// once keeps the first subscriber.
pub fn init(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.level().as_str().to_lowercase()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

pub fn log_info(msg: impl AsRef<str>) {
    tracing::info!("   {}", msg.as_ref());
}

pub fn log_success(msg: impl AsRef<str>) {
    tracing::info!("   ✓ {}", msg.as_ref());
}

pub fn log_warning(msg: impl AsRef<str>) {
    tracing::warn!("   ⚠️ {}", msg.as_ref());
}

pub fn log_error(msg: impl AsRef<str>) {
    tracing::error!("   ❌ {}", msg.as_ref());
}
