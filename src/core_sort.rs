use crate::compare::comparator_for;
use crate::config::{FailurePolicy, OutputSpec, SortConfig, SortMode};
use crate::error::{SortContext, SortError, SortResult};
use crate::line_store::LineStore;
use crate::sort_engine::{self, SortStats};
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// What happened to one output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputReport {
    pub mode: SortMode,
    pub path: PathBuf,
    pub stats: SortStats,
}

/// Result of a full run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub line_count: usize,
    pub bytes_loaded: usize,
    pub outputs: Vec<OutputReport>,
}

/// Load once, then sort and write once per configured output
pub struct CoreSort {
    config: SortConfig,
}

impl CoreSort {
    pub fn new(config: SortConfig) -> Self {
        Self { config }
    }

    /// Run the whole pipeline against the configured input file
    pub fn run(&self) -> SortResult<RunSummary> {
        self.config.validate()?;

        let input = &self.config.input;
        let mut store = LineStore::from_path(input, self.config.mmap_threshold)?;
        info!(
            input = %input.display(),
            lines = store.line_count(),
            bytes = store.byte_len(),
            mapped = store.is_mapped(),
            "loaded input"
        );

        self.ensure_input_not_overwritten()?;
        self.process(&mut store)
    }

    /// Sort and write every output from an already loaded store
    pub fn process(&self, store: &mut LineStore) -> SortResult<RunSummary> {
        let mut summary = RunSummary {
            line_count: store.line_count(),
            bytes_loaded: store.byte_len(),
            outputs: Vec::with_capacity(self.config.outputs.len()),
        };
        let mut failed = 0;

        for output in &self.config.outputs {
            match self.produce(store, output) {
                Ok(report) => summary.outputs.push(report),
                Err(e) => match self.config.failure_policy {
                    FailurePolicy::Abort => return Err(e),
                    FailurePolicy::Continue => {
                        error!(output = %output.path.display(), "{e}");
                        failed += 1;
                    }
                },
            }
        }

        if failed > 0 {
            return Err(SortError::OutputsFailed {
                failed,
                total: self.config.outputs.len(),
            });
        }

        Ok(summary)
    }

    /// Refuse any output that resolves to the input file, whatever its spelling
    fn ensure_input_not_overwritten(&self) -> SortResult<()> {
        let input = &self.config.input;
        for output in self.config.outputs.iter().filter(|o| !o.is_stdout()) {
            if same_file(input, &output.path) {
                return Err(SortError::invalid_config(&format!(
                    "output {} would overwrite the input {}",
                    output.path.display(),
                    input.display()
                )));
            }
        }
        Ok(())
    }

    fn produce(&self, store: &mut LineStore, output: &OutputSpec) -> SortResult<OutputReport> {
        let cmp = comparator_for(output.mode);
        let stats = sort_engine::sort(store, cmp)?;
        debug!(
            mode = %output.mode,
            comparisons = stats.comparisons,
            swaps = stats.swaps,
            ordered = store.is_ordered_by(cmp),
            "sorted lines"
        );

        let target = output.path.display().to_string();
        if output.is_stdout() {
            let stdout = io::stdout();
            store
                .write_to(BufWriter::new(stdout.lock()))
                .with_target("standard output")?;
        } else {
            let file = File::create(&output.path).with_file_context(&target)?;
            store.write_to(BufWriter::new(file)).with_target(&target)?;
        }
        info!(mode = %output.mode, output = %target, "wrote output");

        Ok(OutputReport {
            mode: output.mode,
            path: output.path.clone(),
            stats,
        })
    }
}

/// True if both paths name one existing file. A path that does not exist yet
/// never matches.
#[cfg(unix)]
fn same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
