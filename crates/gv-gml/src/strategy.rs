//! Ordered decode strategies.
//!
//! Each strategy is a named pure function `path -> FeatureTable | cause`.
//! [`load_gml`] tries them in priority order and records which one produced
//! the table, so the batch log can report fallbacks.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use gv_core::FeatureTable;

use crate::error::{GmlError, StrategyFailure};
use crate::reader::{parse, ParseOptions, CITYGML, GML_FEATURE, LENIENT};

/// A named decode strategy.
pub struct Strategy {
    pub name: &'static str,
    opts: &'static ParseOptions,
}

/// Priority order: strict CityGML first, generic GML second, then the
/// relaxed scan that tolerates malformed markup.
pub const STRATEGIES: &[Strategy] = &[
    Strategy { name: "citygml", opts: &CITYGML },
    Strategy { name: "gml-feature", opts: &GML_FEATURE },
    Strategy { name: "lenient", opts: &LENIENT },
];

/// A successfully decoded file: the table plus the strategy that won.
#[derive(Debug)]
pub struct LoadedTable {
    pub table: FeatureTable,
    pub strategy: &'static str,
}

/// Load one GML file, trying each strategy in order.
///
/// The first strategy that succeeds *and* yields a non-empty table wins.
/// All strategies exhausted (or all empty) → [`GmlError::NoUsableData`] with
/// the per-strategy causes.  The file handle is scoped per attempt and
/// released even when decoding fails.
///
/// # Errors
///
/// Never panics and never lets an XML error escape undescribed; a single
/// file's failure must not abort a batch, so callers log the error and
/// continue.
pub fn load_gml(path: &Path) -> Result<LoadedTable, GmlError> {
    let mut attempts = Vec::with_capacity(STRATEGIES.len());

    for strategy in STRATEGIES {
        match run_strategy(path, strategy.opts) {
            Ok(table) if !table.is_empty() => {
                return Ok(LoadedTable {
                    table,
                    strategy: strategy.name,
                });
            }
            Ok(_) => attempts.push(StrategyFailure {
                strategy: strategy.name,
                cause: "no features decoded".to_string(),
            }),
            Err(e) => attempts.push(StrategyFailure {
                strategy: strategy.name,
                cause: e.to_string(),
            }),
        }
    }

    Err(GmlError::NoUsableData { attempts })
}

fn run_strategy(path: &Path, opts: &ParseOptions) -> Result<FeatureTable, GmlError> {
    let file = File::open(path)?;
    parse(BufReader::new(file), opts)
}
