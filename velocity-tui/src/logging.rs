use log::LevelFilter;
use simplelog::*;
use std::fs::{File, OpenOptions};
use std::path::PathBuf;

/// Logging configuration for the terminal dashboard.
/// The terminal owns stdout, so everything goes to a file.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub enabled: bool,
    pub log_file: PathBuf,
    pub clear_on_startup: bool,
    pub features: LogFeatures,
    pub level: LevelFilter,
}

/// Feature flags for specific logging categories
#[derive(Debug, Clone)]
pub struct LogFeatures {
    pub key_events: bool,
    pub api_calls: bool,
    pub general: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_file: PathBuf::from("velocity_tui.log"),
            clear_on_startup: true,
            features: LogFeatures::default(),
            level: LevelFilter::Info,
        }
    }
}

impl Default for LogFeatures {
    fn default() -> Self {
        Self {
            key_events: false,
            api_calls: true,
            general: true,
        }
    }
}

impl LogConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Everything on, down to trace level
    pub fn verbose() -> Self {
        Self {
            level: LevelFilter::Trace,
            features: LogFeatures {
                key_events: true,
                api_calls: true,
                general: true,
            },
            ..Default::default()
        }
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = path.into();
        self
    }
}

/// Open the log file for appending, truncating it first when configured to
fn open_log_file(config: &LogConfig) -> anyhow::Result<File> {
    if config.clear_on_startup {
        File::create(&config.log_file)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;
    Ok(file)
}

/// Initialize the logging system with the given configuration
pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    if !config.enabled {
        let _ = WriteLogger::init(LevelFilter::Off, Config::default(), std::io::sink());
        return Ok(());
    }

    let log_file = open_log_file(config)?;

    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_time_offset_to_local()
        .unwrap_or_else(|builder| builder)
        .build();

    WriteLogger::init(config.level, log_config, log_file)?;

    log::info!(
        "Logging initialized: file={}, level={:?}",
        config.log_file.display(),
        config.level
    );
    Ok(())
}

/// Log a key event when key logging is switched on
#[macro_export]
macro_rules! log_key_event {
    ($config:expr, $($arg:tt)*) => {
        if $config.enabled && $config.features.key_events {
            log::debug!(target: "key_events", $($arg)*);
        }
    };
}

/// Log an API call when API logging is switched on
#[macro_export]
macro_rules! log_api_call {
    ($config:expr, $($arg:tt)*) => {
        if $config.enabled && $config.features.api_calls {
            log::debug!(target: "api_calls", $($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_verbose_enables_every_feature() {
        let config = LogConfig::verbose();
        assert_eq!(config.level, LevelFilter::Trace);
        assert!(config.features.key_events);
        assert!(config.features.api_calls);
    }

    #[test]
    fn test_default_skips_key_events() {
        let config = LogConfig::default();
        assert!(config.enabled);
        assert!(!config.features.key_events);
        assert!(!LogConfig::disabled().enabled);
    }

    #[test]
    fn test_open_log_file_truncates_on_startup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tui.log");
        std::fs::write(&path, "stale output\n").unwrap();

        let config = LogConfig::default().with_file(&path);
        let mut file = open_log_file(&config).unwrap();
        writeln!(file, "fresh").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh\n");
    }

    #[test]
    fn test_open_log_file_appends_when_not_clearing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tui.log");
        std::fs::write(&path, "kept\n").unwrap();

        let config = LogConfig {
            clear_on_startup: false,
            ..LogConfig::default().with_file(&path)
        };
        let mut file = open_log_file(&config).unwrap();
        writeln!(file, "more").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "kept\nmore\n");
    }
}
