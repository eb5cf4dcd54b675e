//! Field extraction from the wiki's card pages.
//!
//! Every function here is pure: a parsed document in, values out. Which
//! regions and labels are used is described by the records in [`rules`].

use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

use crate::error::{Result, YgoError};
use crate::model::FieldPair;

pub mod clean;
pub mod rules;

pub use clean::cleaned_html;
use rules::{AttributeRule, MarkerRowRule, MarkupRule, RowAction, RowRule};

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| YgoError::Parse(format!("Invalid selector '{}': {}", css, e)))
}

fn missing(css: &str) -> YgoError {
    YgoError::Parse(format!("Expected region '{}' not found in page", css))
}

/// Follow a chain of selectors, taking the first match at each step
fn find_region<'a>(document: &'a Html, path: &[&str]) -> Result<ElementRef<'a>> {
    let (first, rest) = path
        .split_first()
        .ok_or_else(|| YgoError::Parse("Empty region path".to_string()))?;

    let mut current = document
        .select(&selector(first)?)
        .next()
        .ok_or_else(|| missing(first))?;

    for css in rest {
        current = current
            .select(&selector(css)?)
            .next()
            .ok_or_else(|| missing(css))?;
    }

    Ok(current)
}

/// Text content of an element with whitespace runs collapsed and trimmed.
/// Line breaks and table cells count as whitespace.
pub fn normalized_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(text) => raw.push_str(text),
            Node::Element(el) if matches!(el.name(), "br" | "td" | "th" | "p" | "li") => raw.push(' '),
            _ => {}
        }
    }
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cleaned markup of a region, with the rule's replacements applied
pub fn extract_markup(document: &Html, rule: &MarkupRule) -> Result<String> {
    let region = find_region(document, rule.region)?;
    let markup = rule
        .replacements
        .iter()
        .fold(cleaned_html(region), |markup, (from, to)| markup.replace(from, to));
    Ok(markup)
}

/// Label/value pairs of a table, in document order
pub fn extract_rows(document: &Html, rule: &RowRule) -> Result<Vec<FieldPair>> {
    let table = find_region(document, &[rule.table])?;
    let row_selector = selector(rule.row)?;
    let header_selector = selector(rule.header)?;
    let data_selector = selector(rule.data)?;

    let mut pairs = Vec::new();
    let mut started = false;

    for row in table.select(&row_selector) {
        let Some(header) = row.select(&header_selector).next() else {
            continue;
        };
        let label = normalized_text(header);

        let action = rule.classify(&label, started);
        if action == RowAction::Skip {
            continue;
        }
        if action == RowAction::Stop {
            break;
        }

        started = true;
        let value = row
            .select(&data_selector)
            .next()
            .map(normalized_text)
            .ok_or_else(|| YgoError::Parse(format!("Row '{}' has no data cell", label)))?;
        pairs.push(FieldPair::new(label, value));

        if action == RowAction::EmitAndStop {
            break;
        }
    }

    Ok(pairs)
}

/// Pairs from the row following the marker row; empty when there is no marker
pub fn extract_marked_row(document: &Html, rule: &MarkerRowRule) -> Result<Vec<FieldPair>> {
    let table = find_region(document, &[rule.table])?;
    let row_selector = selector(rule.row)?;
    let header_selector = selector(rule.header_cell)?;
    let data_selector = selector(rule.data_cell)?;

    let mut rows = table.select(&row_selector);
    if !rows.by_ref().any(|row| normalized_text(row) == rule.marker) {
        return Ok(Vec::new());
    }
    let Some(data_row) = rows.next() else {
        return Ok(Vec::new());
    };

    let pairs = data_row
        .select(&header_selector)
        .zip(data_row.select(&data_selector))
        .map(|(header, data)| FieldPair::new(normalized_text(header), normalized_text(data)))
        .collect();

    Ok(pairs)
}

pub fn extract_attribute(document: &Html, rule: &AttributeRule) -> Result<String> {
    let element = find_region(document, rule.region)?;
    element
        .value()
        .attr(rule.attribute)
        .map(str::to_string)
        .ok_or_else(|| YgoError::Parse(format!("Region has no '{}' attribute", rule.attribute)))
}

/// Card text, as simplified markup
pub fn lore(document: &Html) -> Result<String> {
    extract_markup(document, &rules::LORE)
}

/// Attribute/type/stat rows of the card table
pub fn info(document: &Html) -> Result<Vec<FieldPair>> {
    extract_rows(document, &rules::INFO)
}

/// TCG/OCG banlist statuses; empty when the card has none
pub fn status(document: &Html) -> Result<Vec<FieldPair>> {
    extract_marked_row(document, &rules::STATUS)
}

/// Body of a ruling, tips or trivia page
pub fn page_content(document: &Html) -> Result<String> {
    extract_markup(document, &rules::PAGE_CONTENT)
}

/// Link to the full-size card image
pub fn image_link(document: &Html) -> Result<String> {
    extract_attribute(document, &rules::IMAGE_LINK)
}
