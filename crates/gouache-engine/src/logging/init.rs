use std::sync::Once;

use log::LevelFilter;

/// Dependencies that are noisy at `info` and are capped at `warn` unless an
/// explicit filter says otherwise.
const QUIET_MODULES: [&str; 3] = ["wgpu_core", "wgpu_hal", "naga"];

/// Logger configuration.
///
/// Filter precedence: `env_filter`, then `RUST_LOG`, then `default_level`
/// with [`QUIET_MODULES`] capped at `warn`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `env_logger` filter syntax, e.g. `"gouache_brush=trace,info"`.
    pub env_filter: Option<String>,
    pub default_level: LevelFilter,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: LevelFilter::Info,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// Filter string to hand to `env_logger`, or `None` for the level defaults.
    fn explicit_filter(&self, rust_log: Option<String>) -> Option<String> {
        self.env_filter
            .clone()
            .or(rust_log)
            .filter(|f| !f.trim().is_empty())
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.explicit_filter(std::env::var("RUST_LOG").ok()) {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                builder.filter_level(config.default_level);
                for module in QUIET_MODULES {
                    builder.filter_module(module, config.default_level.min(LevelFilter::Warn));
                }
            }
        }

        builder.write_style(config.write_style);
        builder.format_timestamp_millis();
        builder.init();

        log::debug!("logging initialized");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins_over_env() {
        let config = LoggingConfig {
            env_filter: Some("gouache_brush=trace".into()),
            ..Default::default()
        };
        assert_eq!(
            config.explicit_filter(Some("warn".into())).as_deref(),
            Some("gouache_brush=trace")
        );
    }

    #[test]
    fn env_used_when_unset() {
        let config = LoggingConfig::default();
        assert_eq!(config.explicit_filter(Some("debug".into())).as_deref(), Some("debug"));
    }

    #[test]
    fn blank_filters_fall_back_to_level() {
        let config = LoggingConfig {
            env_filter: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(config.explicit_filter(None), None);
        assert_eq!(LoggingConfig::default().explicit_filter(None), None);
    }
}
