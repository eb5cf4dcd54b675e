//! Declarative extraction rules for the wiki's card pages.
//!
//! Each procedure in [`super`] is driven by one of these records; adding a
//! label or a region marker is a change here, not in the traversal code.

/// Markup of a region found by following a chain of selectors, first match
/// at each step, then rewritten with literal replacements.
#[derive(Debug, Clone, Copy)]
pub struct MarkupRule {
    pub region: &'static [&'static str],
    pub replacements: &'static [(&'static str, &'static str)],
}

/// Label/value rows of a table, with labels that start and end the record.
#[derive(Debug, Clone, Copy)]
pub struct RowRule {
    pub table: &'static str,
    pub row: &'static str,
    pub header: &'static str,
    pub data: &'static str,
    /// Rows are skipped until one of these labels appears
    pub start: &'static [&'static str],
    /// Ends the record; the row itself is not emitted
    pub stop_before: &'static [&'static str],
    /// Ends the record after emitting the row
    pub stop_after: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Skip,
    Emit,
    EmitAndStop,
    Stop,
}

impl RowRule {
    /// Decide what to do with a row given its label and whether the record has started
    pub fn classify(&self, label: &str, started: bool) -> RowAction {
        let listed = |labels: &[&str]| labels.iter().any(|l| *l == label);

        if !started && !listed(self.start) {
            RowAction::Skip
        } else if listed(self.stop_before) {
            RowAction::Stop
        } else if listed(self.stop_after) {
            RowAction::EmitAndStop
        } else {
            RowAction::Emit
        }
    }
}

/// A row identified by its full text, whose successor holds header cells
/// and data cells to be paired positionally.
#[derive(Debug, Clone, Copy)]
pub struct MarkerRowRule {
    pub table: &'static str,
    pub row: &'static str,
    pub marker: &'static str,
    pub header_cell: &'static str,
    pub data_cell: &'static str,
}

/// An attribute of the first element matched by a chain of selectors.
#[derive(Debug, Clone, Copy)]
pub struct AttributeRule {
    pub region: &'static [&'static str],
    pub attribute: &'static str,
}

/// Card text. Definition lists become paragraphs and terms become bold, so
/// pendulum and flavor text render like the rest of the lore.
pub const LORE: MarkupRule = MarkupRule {
    region: &[".cardtablespanrow", ".navbox-list"],
    replacements: &[("<dl", "<p"), ("dl>", "p>"), ("<dt", "<b"), ("dt>", "b>")],
};

/// Attribute for monsters, Type for spells and traps, Types for tokens
pub const INFO: RowRule = RowRule {
    table: ".cardtable",
    row: ".cardtablerow",
    header: ".cardtablerowheader",
    data: ".cardtablerowdata",
    start: &["Attribute", "Type", "Types"],
    stop_before: &["Other card information", "External links"],
    stop_after: &["Card effect types", "Limitation Text"],
};

pub const STATUS: MarkerRowRule = MarkerRowRule {
    table: ".cardtablestatuses",
    row: "tr",
    marker: "TCG/OCG statuses",
    header_cell: "th",
    data_cell: "td",
};

/// Body of a ruling, tips or trivia page
pub const PAGE_CONTENT: MarkupRule = MarkupRule {
    region: &["#mw-content-text"],
    replacements: &[],
};

pub const IMAGE_LINK: AttributeRule = AttributeRule {
    region: &[".cardtable-cardimage", "a"],
    attribute: "href",
};
