//! Tracing subscriber setup
//!
//! Library code only emits `tracing` events; installing a subscriber is left
//! to binaries, which call [`init_tracing`].

use tracing_subscriber::EnvFilter;

/// Selects JSON output when set to `json`.
pub const LOG_FORMAT_ENV: &str = "CHATGUARD_LOG_FORMAT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// Default filter directive, used when `RUST_LOG` is unset or invalid
    pub level: String,
    /// Emit one JSON object per event instead of compact text
    pub json: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl TracingConfig {
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub const fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Defaults, with the output format taken from [`LOG_FORMAT_ENV`].
    pub fn from_env() -> Self {
        let json = std::env::var(LOG_FORMAT_ENV)
            .map(|v| v.trim().eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        Self::default().with_json(json)
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }
}

/// Install a global fmt subscriber writing to stderr.
///
/// Returns `false` when a global subscriber was already installed, in which
/// case nothing changes.
pub fn init_tracing(config: &TracingConfig) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.filter())
        .with_target(true)
        .with_writer(std::io::stderr);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
    installed.is_ok()
}
