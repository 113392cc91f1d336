//! Line sorter producing a lexicographic and a rhyme-ordered copy of a text file
//!
//! The file is loaded once into a single buffer. Lines are addressed by
//! offset/length descriptors, and every sort only permutes those descriptors,
//! so the same buffer serves each output in turn.

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]

pub mod error;
pub mod config;

pub mod line_store;
pub mod compare;
pub mod sort_engine;
pub mod core_sort;

// Re-export commonly used types
pub use error::{SortError, SortResult};
pub use config::{FailurePolicy, OutputSpec, SortConfig, SortMode};
pub use compare::{LexLess, LineComparator, RhymeLess};
pub use line_store::{LineDescriptor, LineStore};
pub use sort_engine::SortStats;
pub use core_sort::{CoreSort, RunSummary};

/// Process exit codes
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const SORT_FAILURE: i32 = 2;

/// Run the configured load, sort and write pipeline
pub fn sort(config: &SortConfig) -> SortResult<i32> {
    let summary = CoreSort::new(config.clone()).run()?;
    tracing::debug!(
        lines = summary.line_count,
        outputs = summary.outputs.len(),
        "run complete"
    );
    Ok(EXIT_SUCCESS)
}
