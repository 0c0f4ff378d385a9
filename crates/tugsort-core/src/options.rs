//! Sort options and their compiled form.
//!
//! [`SortOptions`] is what users write: a JSON object using the option names
//! of the prettier import-sort plugin (`importOrder`, `importOrderSeparation`,
//! ...). [`SortOptions::compile`] validates every pattern once and produces
//! [`CompiledOptions`], which the pipeline consumes.
//!
//! ## Import order
//!
//! `importOrder` is a list of regular expressions matched against each
//! import's module path. The first matching entry decides the group. The
//! special entry [`THIRD_PARTY_MODULES`] collects everything unmatched; when
//! it is missing it is placed first.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{SortError, SortResult};
use crate::group::{LengthMode, SortConfig};

/// Placeholder for imports no other `importOrder` entry matches.
pub const THIRD_PARTY_MODULES: &str = "<THIRD_PARTY_MODULES>";

// ============================================================================
// Attributes keyword
// ============================================================================

/// Keyword used when regenerating import attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributesKeyword {
    /// `import data from "./a.json" with { type: "json" }`
    #[default]
    With,
    /// `import data from "./a.json" assert { type: "json" }`
    Assert,
}

impl AttributesKeyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributesKeyword::With => "with",
            AttributesKeyword::Assert => "assert",
        }
    }
}

impl fmt::Display for AttributesKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AttributesKeyword {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "with" => Ok(AttributesKeyword::With),
            "assert" => Ok(AttributesKeyword::Assert),
            other => Err(SortError::invalid_args(format!(
                "unknown import attributes keyword '{}'",
                other
            ))),
        }
    }
}

// ============================================================================
// User-facing options
// ============================================================================

/// Options as written in a config file.
///
/// Unknown keys are ignored, so a prettier config file can be read directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortOptions {
    /// Group patterns in output order.
    #[serde(rename = "importOrder")]
    pub import_order: Vec<String>,

    /// Case-insensitive group patterns and natural comparisons.
    #[serde(rename = "importOrderCaseInsensitive")]
    pub case_insensitive: bool,

    /// Blank line between groups.
    #[serde(rename = "importOrderSeparation")]
    pub separation: bool,

    /// Sort the bindings inside each import.
    #[serde(rename = "importOrderSortSpecifiers")]
    pub sort_specifiers: bool,

    /// Namespace imports first within a group.
    #[serde(rename = "importOrderGroupNamespaceSpecifiers")]
    pub group_namespace_specifiers: bool,

    /// Order statements by length instead of module path.
    #[serde(rename = "importOrderSortByLength")]
    pub sort_by_length: Option<LengthMode>,

    /// When false, side-effect imports stay where they are and split sorting.
    #[serde(rename = "importOrderSideEffects")]
    pub side_effects: bool,

    #[serde(rename = "importOrderImportAttributesKeyword")]
    pub import_attributes_keyword: AttributesKeyword,

    /// Globs of file paths that are never sorted.
    #[serde(rename = "importOrderExclude")]
    pub exclude: Vec<String>,
}

impl Default for SortOptions {
    fn default() -> Self {
        SortOptions {
            import_order: Vec::new(),
            case_insensitive: false,
            separation: false,
            sort_specifiers: false,
            group_namespace_specifiers: false,
            sort_by_length: None,
            side_effects: true,
            import_attributes_keyword: AttributesKeyword::With,
            exclude: Vec::new(),
        }
    }
}

impl SortOptions {
    /// Parse options from a JSON document.
    pub fn from_json(json: &str) -> SortResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The group configuration these options describe.
    pub fn sort_config(&self) -> SortConfig {
        SortConfig::default()
            .with_length_mode(self.sort_by_length.unwrap_or_default())
            .with_namespace_priority(self.group_namespace_specifiers)
            .with_case_insensitive(self.case_insensitive)
    }

    /// Validate patterns and globs.
    pub fn compile(&self) -> SortResult<CompiledOptions> {
        let mut groups = self
            .import_order
            .iter()
            .map(|pattern| ImportGroup::parse(pattern, self.case_insensitive))
            .collect::<SortResult<Vec<_>>>()?;
        if !groups.iter().any(ImportGroup::is_third_party) {
            groups.insert(0, ImportGroup::ThirdParty);
        }

        Ok(CompiledOptions {
            groups,
            config: self.sort_config(),
            separation: self.separation,
            sort_specifiers: self.sort_specifiers,
            side_effects: self.side_effects,
            attributes_keyword: self.import_attributes_keyword,
            exclude: build_glob_set(&self.exclude)?,
        })
    }
}

// ============================================================================
// Compiled options
// ============================================================================

/// One entry of the import order.
#[derive(Debug, Clone)]
pub enum ImportGroup {
    ThirdParty,
    Pattern(Regex),
}

impl ImportGroup {
    fn parse(pattern: &str, case_insensitive: bool) -> SortResult<Self> {
        if pattern == THIRD_PARTY_MODULES {
            return Ok(ImportGroup::ThirdParty);
        }
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(case_insensitive)
            .build()
            .map_err(|e| SortError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;
        Ok(ImportGroup::Pattern(regex))
    }

    pub fn is_third_party(&self) -> bool {
        matches!(self, ImportGroup::ThirdParty)
    }

    /// Pattern text, or [`THIRD_PARTY_MODULES`].
    pub fn label(&self) -> &str {
        match self {
            ImportGroup::ThirdParty => THIRD_PARTY_MODULES,
            ImportGroup::Pattern(regex) => regex.as_str(),
        }
    }
}

/// Validated options consumed by the pipeline.
#[derive(Debug, Clone)]
pub struct CompiledOptions {
    /// Groups in output order, always containing a third-party entry.
    groups: Vec<ImportGroup>,
    pub config: SortConfig,
    pub separation: bool,
    pub sort_specifiers: bool,
    pub side_effects: bool,
    pub attributes_keyword: AttributesKeyword,
    exclude: GlobSet,
}

impl CompiledOptions {
    pub fn groups(&self) -> &[ImportGroup] {
        &self.groups
    }

    /// Index of the group a module path belongs to.
    ///
    /// Third-party is the fallback, so this always returns a valid index.
    pub fn group_index(&self, source: &str) -> usize {
        let matched = self.groups.iter().position(|group| match group {
            ImportGroup::Pattern(regex) => regex.is_match(source),
            ImportGroup::ThirdParty => false,
        });
        matched
            .or_else(|| self.groups.iter().position(ImportGroup::is_third_party))
            .unwrap_or(0)
    }

    /// True when `path` matches an exclude glob.
    pub fn is_excluded(&self, path: &Path) -> bool {
        !self.exclude.is_empty() && self.exclude.is_match(path)
    }
}

impl Default for CompiledOptions {
    fn default() -> Self {
        CompiledOptions {
            groups: vec![ImportGroup::ThirdParty],
            config: SortConfig::default(),
            separation: false,
            sort_specifiers: false,
            side_effects: true,
            attributes_keyword: AttributesKeyword::With,
            exclude: GlobSet::empty(),
        }
    }
}

fn build_glob_set(patterns: &[String]) -> SortResult<GlobSet> {
    let mut builder = GlobSetBuilder::new();

    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| SortError::InvalidGlob {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        builder.add(glob);
    }

    builder.build().map_err(|e| SortError::InvalidGlob {
        pattern: "<combined>".to_string(),
        message: e.to_string(),
    })
}

// ============================================================================
// Tests
// ============================================================================
