//! Configuration for the gps-dump daemon
//!
//! Loads configuration from a TOML file. Every field has a default, so an
//! empty file (or no file at all) yields a working full-mode dump of stdin.
//!
//! ```toml
//! [dump]
//! mode = "full"          # disabled | full | rtcm
//! instance = 0
//! capacity = 200
//!
//! [input]
//! path = "-"             # "-" reads stdin
//! chunk_size = 64
//! mode = "full"
//! direction = "from_device"
//!
//! [output]
//! path = "gps_dump.bin"
//! format = "postcard"    # postcard | json
//! queue_depth = 64
//! overflow = "drop"      # drop | block
//!
//! [logging]
//! level = "info"
//! ```

use crate::core::types::{Direction, DumpMode};
use crate::dump::record::DEFAULT_CAPACITY;
use crate::error::{Error, Result};
use crate::sink::{OverflowPolicy, WireFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub dump: DumpConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Dumper configuration for one receiver instance
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DumpConfig {
    /// Active dump mode
    #[serde(default = "default_active_mode")]
    pub mode: DumpMode,
    /// Receiver instance id stamped on every record
    #[serde(default)]
    pub instance: u8,
    /// Window size in bytes
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

/// Upstream byte source
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    /// File to read, `-` for stdin
    #[serde(default = "default_input_path")]
    pub path: String,
    /// Bytes handed to the dumper per call
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Mode the incoming traffic is tagged with
    #[serde(default = "default_active_mode")]
    pub mode: DumpMode,
    /// Link direction the incoming traffic belongs to
    #[serde(default)]
    pub direction: Direction,
}

/// Dump file output
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Dump file path
    #[serde(default = "default_output_path")]
    pub path: String,
    /// Record encoding inside the dump file
    #[serde(default)]
    pub format: WireFormat,
    /// Records buffered between dumper and writer thread
    #[serde(default = "default_queue_depth")]
    pub queue_depth: usize,
    /// Behaviour when the writer falls behind; `block` stalls the dumper
    #[serde(default = "default_overflow")]
    pub overflow: OverflowPolicy,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default log level (trace, debug, info, warn, error); `RUST_LOG` wins
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_active_mode() -> DumpMode {
    DumpMode::Full
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_input_path() -> String {
    "-".to_string()
}

fn default_chunk_size() -> usize {
    64
}

fn default_output_path() -> String {
    "gps_dump.bin".to_string()
}

fn default_queue_depth() -> usize {
    64
}

fn default_overflow() -> OverflowPolicy {
    OverflowPolicy::Drop
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            mode: default_active_mode(),
            instance: 0,
            capacity: default_capacity(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: default_input_path(),
            chunk_size: default_chunk_size(),
            mode: default_active_mode(),
            direction: Direction::FromDevice,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            format: WireFormat::default(),
            queue_depth: default_queue_depth(),
            overflow: default_overflow(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load and validate configuration from a TOML file
    ///
    /// # Example
    /// ```no_run
    /// use gps_dump::config::Config;
    ///
    /// let config = Config::load("gps_dump.toml")?;
    /// # Ok::<(), gps_dump::Error>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Reject values the dumper cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.dump.capacity == 0 {
            return Err(Error::InvalidParameter(
                "dump.capacity must be at least 1".to_string(),
            ));
        }
        if self.input.chunk_size == 0 {
            return Err(Error::InvalidParameter(
                "input.chunk_size must be at least 1".to_string(),
            ));
        }
        if self.output.queue_depth == 0 {
            return Err(Error::InvalidParameter(
                "output.queue_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
