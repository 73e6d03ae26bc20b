use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const DEFAULT_RING_CAPACITY: NonZeroUsize = NonZeroUsize::new(7).unwrap();
const MAX_RING_CAPACITY: usize = 64;

pub fn config_file() -> PathBuf { dirs::home_dir().unwrap_or_default().join(".frame-ring.toml") }

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    settings: Settings,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
pub struct Config {
    pub settings: Settings,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Saved layouts kept per frame. The live layout is not counted.
    #[serde(default = "default_ring_capacity")]
    pub ring_capacity: usize,
    /// What the single remaining view shows after a new layout is started.
    #[serde(default)]
    pub default_content: DefaultContent,
    #[serde(default = "yes")]
    pub show_names_in_status: bool,
}

/// Content of the view left behind by `new_configuration`.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "snake_case")]
pub enum DefaultContent {
    /// Keep whatever the selected view is already showing.
    CurrentlyShown,
    Buffer(String),
}

impl Default for DefaultContent {
    fn default() -> Self { DefaultContent::Buffer(default_buffer()) }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ring_capacity: default_ring_capacity(),
            default_content: DefaultContent::default(),
            show_names_in_status: true,
        }
    }
}

impl Settings {
    /// Capacity to build rings with. Falls back to the default when the
    /// configured value is out of range.
    pub fn capacity(&self) -> NonZeroUsize {
        match NonZeroUsize::new(self.ring_capacity) {
            Some(capacity) if capacity.get() <= MAX_RING_CAPACITY => capacity,
            _ => DEFAULT_RING_CAPACITY,
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.ring_capacity == 0 {
            issues.push("ring_capacity must be at least 1".to_string());
        }
        if self.ring_capacity > MAX_RING_CAPACITY {
            issues.push(format!(
                "ring_capacity should not exceed {}, got {}",
                MAX_RING_CAPACITY, self.ring_capacity
            ));
        }

        if let DefaultContent::Buffer(name) = &self.default_content {
            if name.trim().is_empty() {
                issues.push("default_content buffer name must not be empty".to_string());
            }
        }

        issues
    }

    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;

        if self.ring_capacity == 0 || self.ring_capacity > MAX_RING_CAPACITY {
            self.ring_capacity = default_ring_capacity();
            fixes += 1;
        }

        if let DefaultContent::Buffer(name) = &self.default_content {
            if name.trim().is_empty() {
                self.default_content = DefaultContent::default();
                fixes += 1;
            }
        }

        fixes
    }
}

fn yes() -> bool { true }

fn default_ring_capacity() -> usize { DEFAULT_RING_CAPACITY.get() }

fn default_buffer() -> String { "*scratch*".to_string() }

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)?;
        Self::parse(&buf)
    }

    /// The configuration shipped with the crate.
    pub fn builtin() -> anyhow::Result<Config> { Self::parse(include_str!("../../frame-ring.default.toml")) }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let config_file = ConfigFile {
            settings: self.settings.clone(),
        };

        let toml_string = toml::to_string_pretty(&config_file)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, toml_string.as_bytes())?;

        Ok(())
    }

    /// Validates the entire configuration and returns a list of issues found.
    pub fn validate(&self) -> Vec<String> { self.settings.validate() }

    /// Attempts to fix configuration values automatically.
    /// Returns the number of fixes applied.
    pub fn auto_fix_values(&mut self) -> usize { self.settings.auto_fix_values() }

    fn parse(buf: &str) -> anyhow::Result<Config> {
        let c: ConfigFile = toml::from_str(buf)?;
        Ok(Config { settings: c.settings })
    }
}
