//! CLI command implementations.

mod check;
mod coverage;
mod dump;
mod format;

pub use check::{CheckArgs, run_check};
pub use coverage::{CoverageArgs, run_coverage};
pub use dump::{DumpArgs, run_dump};
pub use format::{FormatArgs, run_format};
