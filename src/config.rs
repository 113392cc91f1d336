//! Configuration management for rhyme sort runs

use crate::error::{SortError, SortResult};
use std::collections::HashSet;
use std::path::PathBuf;
use std::str::FromStr;

/// Default input file
pub const DEFAULT_INPUT: &str = "text.txt";
/// Default destination for the lexicographic ordering
pub const DEFAULT_LEX_OUTPUT: &str = "text1.txt";
/// Default destination for the rhyme ordering
pub const DEFAULT_RHYME_OUTPUT: &str = "text2.txt";
/// Files at least this large are memory-mapped instead of read
pub const DEFAULT_MMAP_THRESHOLD: u64 = 64 * 1024 * 1024;

/// Path that stands for standard output
pub const STDOUT_PATH: &str = "-";

/// Line ordering to apply before writing an output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// Byte-wise order from the start of each line
    Lexicographic,
    /// Alphabetic bytes compared from the end of each line
    Rhyme,
}

/// What to do once an output fails to be written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failed output
    #[default]
    Abort,
    /// Attempt every output, then report how many failed
    Continue,
}

/// One sorted copy of the input and where it goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSpec {
    pub mode: SortMode,
    pub path: PathBuf,
}

impl OutputSpec {
    pub fn new(mode: SortMode, path: impl Into<PathBuf>) -> Self {
        Self {
            mode,
            path: path.into(),
        }
    }

    /// True if this output goes to standard output
    pub fn is_stdout(&self) -> bool {
        self.path.as_os_str() == STDOUT_PATH
    }
}

/// Main configuration structure for a run
#[derive(Debug, Clone)]
pub struct SortConfig {
    /// File to load
    pub input: PathBuf,
    /// Outputs, produced in order from the same loaded file
    pub outputs: Vec<OutputSpec>,
    /// Behaviour after a failed output
    pub failure_policy: FailurePolicy,
    /// Minimum file size for memory-mapped loading; 0 disables mapping
    pub mmap_threshold: u64,
    /// Verbose logging
    pub verbose: bool,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            outputs: vec![
                OutputSpec::new(SortMode::Lexicographic, DEFAULT_LEX_OUTPUT),
                OutputSpec::new(SortMode::Rhyme, DEFAULT_RHYME_OUTPUT),
            ],
            failure_policy: FailurePolicy::Abort,
            mmap_threshold: DEFAULT_MMAP_THRESHOLD,
            verbose: false,
        }
    }
}

impl SortConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the input file
    pub fn with_input(mut self, input: impl Into<PathBuf>) -> Self {
        self.input = input.into();
        self
    }

    /// Replace all outputs
    pub fn with_outputs(mut self, outputs: Vec<OutputSpec>) -> Self {
        self.outputs = outputs;
        self
    }

    /// Parse the memory-map threshold, accepting K, M and G suffixes
    pub fn set_mmap_threshold_from_string(&mut self, size_str: &str) -> SortResult<()> {
        self.mmap_threshold = parse_size(size_str)?;
        Ok(())
    }

    /// Validate configuration for consistency
    pub fn validate(&self) -> SortResult<()> {
        if self.input.as_os_str().is_empty() {
            return Err(SortError::invalid_config("input path is empty"));
        }

        if self.outputs.is_empty() {
            return Err(SortError::invalid_config("at least one output is required"));
        }

        let mut seen = HashSet::new();
        let mut stdout_outputs = 0;
        for output in &self.outputs {
            if output.path.as_os_str().is_empty() {
                return Err(SortError::invalid_config(&format!(
                    "empty path for {} output",
                    output.mode
                )));
            }
            if output.is_stdout() {
                stdout_outputs += 1;
                continue;
            }
            if output.path == self.input {
                return Err(SortError::invalid_config(&format!(
                    "output {} would overwrite the input",
                    output.path.display()
                )));
            }
            if !seen.insert(&output.path) {
                return Err(SortError::invalid_config(&format!(
                    "output {} is given more than once",
                    output.path.display()
                )));
            }
        }

        if stdout_outputs > 1 {
            return Err(SortError::invalid_config(
                "only one output may go to standard output",
            ));
        }

        Ok(())
    }
}

/// Parse a byte count with an optional K/M/G suffix (powers of 1024)
pub fn parse_size(size_str: &str) -> SortResult<u64> {
    let trimmed = size_str.trim();
    let invalid = || SortError::parse_error(&format!("invalid size: {size_str}"));

    let (digits, multiplier) = match trimmed.char_indices().last() {
        Some((idx, suffix)) if suffix.is_ascii_alphabetic() => {
            let multiplier: u64 = match suffix.to_ascii_uppercase() {
                'B' => 1,
                'K' => 1024,
                'M' => 1024 * 1024,
                'G' => 1024 * 1024 * 1024,
                _ => return Err(invalid()),
            };
            (&trimmed[..idx], multiplier)
        }
        Some(_) => (trimmed, 1),
        None => return Err(invalid()),
    };

    digits
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(multiplier))
        .ok_or_else(invalid)
}

impl FromStr for SortMode {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lexicographic" => Ok(SortMode::Lexicographic),
            "rhyme" => Ok(SortMode::Rhyme),
            _ => Err(SortError::parse_error(&format!("unknown sort mode: {s}"))),
        }
    }
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SortMode::Lexicographic => "lexicographic",
            SortMode::Rhyme => "rhyme",
        };
        write!(f, "{name}")
    }
}

/// Builder pattern for creating configurations
pub struct SortConfigBuilder {
    config: SortConfig,
    custom_outputs: bool,
}

impl SortConfigBuilder {
    /// Start building a new configuration
    pub fn new() -> Self {
        Self {
            config: SortConfig::default(),
            custom_outputs: false,
        }
    }

    /// Set the input file
    pub fn input(mut self, input: impl Into<PathBuf>) -> Self {
        self.config.input = input.into();
        self
    }

    /// Add an output; the first call replaces the default outputs
    pub fn output(mut self, mode: SortMode, path: impl Into<PathBuf>) -> Self {
        if !self.custom_outputs {
            self.config.outputs.clear();
            self.custom_outputs = true;
        }
        self.config.outputs.push(OutputSpec::new(mode, path));
        self
    }

    /// Attempt every output even after a failure
    pub fn keep_going(mut self) -> Self {
        self.config.failure_policy = FailurePolicy::Continue;
        self
    }

    /// Set the memory-map threshold
    pub fn mmap_threshold(mut self, threshold: u64) -> Self {
        self.config.mmap_threshold = threshold;
        self
    }

    /// Enable verbose logging
    pub fn verbose(mut self) -> Self {
        self.config.verbose = true;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> SortResult<SortConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for SortConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
