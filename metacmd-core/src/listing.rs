//! Help listing renderer.
//!
//! Renders every registered meta command, grouped by [`Section`], as a
//! column-aligned plain-text listing:
//!
//! ```text
//! General
//!   \q                  quit
//!   \copyright          show usage and distribution terms
//!
//! Query Execute
//!   \g [FILE] or ;      execute query
//!
//! ```
//!
//! Layout happens in two separate phases. [`build`] walks all sections and
//! collects rows while tracking the widest label; [`Layout::write_to`] then
//! emits the rows padded to that single width. Every row in every section is
//! padded to the same width, so the widest label has to be known before the
//! first row is written.

use std::io::Write;

use crate::command::Desc;
use crate::error::ListingError;
use crate::registry::CommandRegistry;
use crate::section::Section;

/// Literal prefix in front of every command or alias label.
pub const MARKER: &str = "  \\";

/// A single listing line before padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub label: String,
    pub description: String,
}

impl Row {
    fn new(name: &str, desc: &Desc) -> Self {
        Self {
            label: format!("{MARKER}{name}{}", desc.params_suffix()),
            description: desc.desc.clone(),
        }
    }
}

/// Rows for every section plus the global pad width.
#[derive(Debug, Clone)]
pub struct Layout {
    sections: Vec<(Section, Vec<Row>)>,
    width: usize,
}

impl Layout {
    /// Width every label is padded to, in bytes.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Sections in display order with their rows.
    pub fn sections(&self) -> impl Iterator<Item = (Section, &[Row])> {
        self.sections
            .iter()
            .map(|(section, rows)| (*section, rows.as_slice()))
    }

    /// Total number of command and alias rows.
    pub fn row_count(&self) -> usize {
        self.sections.iter().map(|(_, rows)| rows.len()).sum()
    }

    /// Emit the listing. Stops at the first failed write.
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> Result<(), ListingError> {
        for (section, rows) in &self.sections {
            writeln!(w, "{section}")?;
            for row in rows {
                let pad = self.width - row.label.len();
                writeln!(w, "{}{:pad$} {}", row.label, "", row.description)?;
            }
            writeln!(w)?;
        }
        Ok(())
    }
}

/// Collect listing rows for every section and compute the pad width.
///
/// Sections with no commands are kept so that their heading is still
/// printed.
pub fn build(registry: &CommandRegistry) -> Layout {
    let mut width = 0;
    let mut sections = Vec::with_capacity(Section::all().len());

    for &section in Section::all() {
        let mut rows = Vec::new();
        for cmd in registry.commands_in(section) {
            rows.push(Row::new(&cmd.name, &cmd.desc));
            for alias in cmd.listed_aliases() {
                rows.push(Row::new(alias.name(), &alias.desc));
            }
        }
        width = rows.iter().map(|row| row.label.len()).fold(width, usize::max);
        sections.push((section, rows));
    }

    let layout = Layout { sections, width };
    tracing::debug!(
        rows = layout.row_count(),
        width = layout.width,
        "Built meta command listing"
    );
    layout
}

/// Write the full listing for `registry` to `w`.
pub fn write_listing<W: Write + ?Sized>(
    registry: &CommandRegistry,
    w: &mut W,
) -> Result<(), ListingError> {
    build(registry).write_to(w)
}

/// Render the full listing into a string.
pub fn render(registry: &CommandRegistry) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_listing(registry, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}
