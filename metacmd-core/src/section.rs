//! Help listing sections.
//!
//! Every meta command belongs to exactly one section. Sections are a closed
//! set with a fixed display order that is independent of declaration and
//! registration order.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SectionParseError;

/// Sections used to group meta commands in the help listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Section {
    General,
    QueryExecute,
    QueryBuffer,
    Help,
    Transaction,
    InputOutput,
    Informational,
    Formatting,
    Connection,
    OperatingSystem,
    Variables,
}

impl Section {
    pub fn label(&self) -> &'static str {
        match self {
            Section::General => "General",
            Section::QueryExecute => "Query Execute",
            Section::QueryBuffer => "Query Buffer",
            Section::Help => "Help",
            Section::Transaction => "Transaction",
            Section::InputOutput => "Input/Output",
            Section::Informational => "Informational",
            Section::Formatting => "Formatting",
            Section::Connection => "Connection",
            Section::OperatingSystem => "Operating System",
            Section::Variables => "Variables",
        }
    }

    /// All sections, in listing display order.
    pub fn all() -> &'static [Section] {
        &[
            Section::General,
            Section::QueryExecute,
            Section::QueryBuffer,
            Section::Help,
            Section::InputOutput,
            Section::Informational,
            Section::Formatting,
            Section::Transaction,
            Section::Connection,
            Section::OperatingSystem,
            Section::Variables,
        ]
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Fold a section name down to lowercase alphanumerics so that
/// `"Input/Output"`, `"input-output"` and `"INPUT_OUTPUT"` compare equal.
fn fold(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl FromStr for Section {
    type Err = SectionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded = fold(s);
        Section::all()
            .iter()
            .copied()
            .find(|section| !folded.is_empty() && fold(section.label()) == folded)
            .ok_or_else(|| SectionParseError::UnknownSection {
                name: s.to_string(),
            })
    }
}

impl TryFrom<String> for Section {
    type Error = SectionParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Section> for String {
    fn from(section: Section) -> Self {
        section.label().to_string()
    }
}
