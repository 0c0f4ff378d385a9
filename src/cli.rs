//! CLI helpers: loading inputs, layering options, running one file.
//!
//! `main.rs` owns argument parsing and output; everything here returns
//! `SortResult` so errors reach the JSON error envelope with a stable code.
//!
//! ## Option layering
//!
//! 1. defaults ([`SortOptions::default`])
//! 2. the `--config` JSON file, if given
//! 3. command-line flags ([`OptionOverrides`])

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use tugsort_core::ast::Program;
use tugsort_core::error::{SortError, SortResult};
use tugsort_core::group::LengthMode;
use tugsort_core::options::{AttributesKeyword, CompiledOptions, SortOptions};
use tugsort_core::pipeline::{sort_imports, SortOutcome};

/// Option values given on the command line.
///
/// Boolean flags can only switch a behavior on; `None` and empty lists leave
/// the configured value alone.
#[derive(Debug, Clone, Default)]
pub struct OptionOverrides {
    pub import_order: Vec<String>,
    pub length_mode: Option<LengthMode>,
    pub namespace_first: bool,
    pub sort_specifiers: bool,
    pub separation: bool,
    pub case_insensitive: bool,
    /// Keep side-effect imports in place.
    pub keep_side_effects: bool,
    pub attributes_keyword: Option<AttributesKeyword>,
    pub exclude: Vec<String>,
}

impl OptionOverrides {
    pub fn apply(&self, options: &mut SortOptions) {
        if !self.import_order.is_empty() {
            options.import_order = self.import_order.clone();
        }
        if let Some(mode) = self.length_mode {
            options.sort_by_length = Some(mode);
        }
        options.group_namespace_specifiers |= self.namespace_first;
        options.sort_specifiers |= self.sort_specifiers;
        options.separation |= self.separation;
        options.case_insensitive |= self.case_insensitive;
        if self.keep_side_effects {
            options.side_effects = false;
        }
        if let Some(keyword) = self.attributes_keyword {
            options.import_attributes_keyword = keyword;
        }
        options.exclude.extend(self.exclude.iter().cloned());
    }
}

/// Read a text file, mapping a missing file to `FileNotFound`.
pub fn read_file(path: &Path) -> SortResult<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => SortError::file_not_found(path.display().to_string()),
        _ => SortError::Io(e),
    })
}

/// Layer the config file and the overrides over the defaults, then compile.
pub fn load_options(config: Option<&Path>, overrides: &OptionOverrides) -> SortResult<CompiledOptions> {
    let mut options = match config {
        Some(path) => {
            debug!("Loading options from {}", path.display());
            SortOptions::from_json(&read_file(path)?)?
        }
        None => SortOptions::default(),
    };
    overrides.apply(&mut options);
    options.compile()
}

/// Paths of one file to sort.
#[derive(Debug, Clone)]
pub struct FileInputs {
    /// Source text.
    pub source: PathBuf,
    /// Parser output for `source`, as JSON.
    pub ast: PathBuf,
}

/// One file's original text and sort result.
#[derive(Debug, Clone)]
pub struct FileRun {
    pub path: PathBuf,
    pub original: String,
    pub outcome: SortOutcome,
}

impl FileRun {
    pub fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

/// Load `inputs` and sort them.
pub fn run_file(inputs: &FileInputs, options: &CompiledOptions) -> SortResult<FileRun> {
    let original = read_file(&inputs.source)?;
    let program = Program::from_json(&read_file(&inputs.ast)?)?;
    let outcome = sort_imports(&original, &program, options, Some(&inputs.source))?;
    info!(
        "{}: {} imports, changed: {}",
        inputs.source.display(),
        outcome.modules.len(),
        outcome.changed
    );
    Ok(FileRun {
        path: inputs.source.clone(),
        original,
        outcome,
    })
}

/// Write the sorted text back when it differs. Returns whether it wrote.
pub fn write_back(run: &FileRun) -> SortResult<bool> {
    if !run.outcome.changed {
        return Ok(false);
    }
    fs::write(&run.path, &run.outcome.code)?;
    debug!("Wrote {}", run.path.display());
    Ok(true)
}
