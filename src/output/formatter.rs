use colored::*;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use scraper::node::Node;
use scraper::Html;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::model::FieldPair;
use crate::router::{CardData, CardDetail, CardQuery, DataSource};

pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Format the answer to a single card query
    pub fn format_card_data(&self, name: &str, query: CardQuery, data: &CardData) -> Result<String> {
        match self.format {
            OutputFormat::Table => Ok(self.format_card_data_table(name, query, data)),
            OutputFormat::Json => {
                let value = json!({
                    "name": name,
                    "query": query_key(query),
                    "data": data,
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
        }
    }

    /// Format a list of card names
    pub fn format_names(&self, names: &[String], total: usize, source: DataSource) -> Result<String> {
        match self.format {
            OutputFormat::Table => Ok(self.format_names_table(names, total, source)),
            OutputFormat::Json => {
                let value = json!({
                    "source": source,
                    "total": total,
                    "names": names,
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
        }
    }

    /// Format every field group of a card
    pub fn format_detail(&self, detail: &CardDetail, show_image_hint: bool) -> Result<String> {
        match self.format {
            OutputFormat::Table => Ok(self.format_detail_table(detail, show_image_hint)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&detail_json(detail))?),
        }
    }

    // Table formatting methods
    fn format_card_data_table(&self, name: &str, query: CardQuery, data: &CardData) -> String {
        let mut result = String::new();
        result.push_str(&format!("\n{} {} - {}\n", "🃏".cyan(), name.bold(), query_title(query)));
        result.push_str(&"=".repeat(80));
        result.push('\n');

        match data {
            CardData::Text(text) => result.push_str(&render_markup(text)),
            CardData::Fields(fields) if fields.is_empty() => result.push_str("No entries."),
            CardData::Fields(fields) => result.push_str(&fields_table(fields).to_string()),
        }

        result
    }

    fn format_names_table(&self, names: &[String], total: usize, source: DataSource) -> String {
        let mut table = Table::new();
        table.set_header(vec![
            Cell::new("#").fg(Color::Cyan),
            Cell::new("Card").fg(Color::Cyan),
        ]);
        for (idx, name) in names.iter().enumerate() {
            table.add_row(vec![Cell::new(idx + 1), Cell::new(name)]);
        }
        table.set_content_arrangement(ContentArrangement::Dynamic);

        let mut result = String::new();
        result.push_str(&format!(
            "\n{} Total: {} | Showing: {} | Source: {}\n\n",
            "📊".cyan(),
            total.to_string().yellow(),
            names.len().to_string().yellow(),
            source.to_string().yellow()
        ));
        result.push_str(&table.to_string());
        result
    }

    fn format_detail_table(&self, detail: &CardDetail, show_image_hint: bool) -> String {
        let mut result = String::new();

        result.push_str(&format!("\n{} {}\n", "🃏".cyan(), detail.name.bold()));
        result.push_str(&"=".repeat(80));
        result.push('\n');
        result.push_str(&format!("Source: {}\n", detail.source));

        match &detail.image {
            Ok(link) => result.push_str(&format!("Image:  {}\n", link)),
            Err(e) if show_image_hint => {
                result.push_str(&format!("Image:  {}\n", e.to_string().dimmed()))
            }
            Err(_) => {}
        }

        result.push_str(&section("Card text"));
        match &detail.lore {
            Ok(lore) => result.push_str(&render_markup(lore)),
            Err(e) => result.push_str(&failed(e)),
        }
        result.push('\n');

        result.push_str(&section("Card information"));
        match &detail.info {
            Ok(fields) => result.push_str(&fields_table(fields).to_string()),
            Err(e) => result.push_str(&failed(e)),
        }
        result.push('\n');

        result.push_str(&section("Banlist status"));
        match &detail.status {
            Ok(fields) if fields.is_empty() => result.push_str("Not available."),
            Ok(fields) => result.push_str(&fields_table(fields).to_string()),
            Err(e) => result.push_str(&failed(e)),
        }

        result
    }
}

fn section(title: &str) -> String {
    format!("\n{} {}\n{}\n", "📋".cyan(), title.bold(), "-".repeat(80))
}

fn failed(error: &crate::error::YgoError) -> String {
    format!("{} {}", "✗".red(), error)
}

fn fields_table(fields: &[FieldPair]) -> Table {
    let mut table = Table::new();
    for field in fields {
        table.add_row(vec![Cell::new(&field.label).fg(Color::Cyan), Cell::new(&field.value)]);
    }
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn query_key(query: CardQuery) -> &'static str {
    match query {
        CardQuery::Lore => "lore",
        CardQuery::Info => "info",
        CardQuery::Status => "status",
        CardQuery::Image => "image",
        CardQuery::Additional(kind) => kind.as_str(),
    }
}

fn query_title(query: CardQuery) -> &'static str {
    match query {
        CardQuery::Lore => "Card text",
        CardQuery::Info => "Card information",
        CardQuery::Status => "Banlist status",
        CardQuery::Image => "Image",
        CardQuery::Additional(kind) => kind.display_name(),
    }
}

fn group_json<T: serde::Serialize>(group: &Result<T>) -> Value {
    match group {
        Ok(value) => json!({ "ok": value }),
        Err(e) => json!({ "error": e.to_string() }),
    }
}

fn detail_json(detail: &CardDetail) -> Value {
    json!({
        "name": detail.name,
        "source": detail.source,
        "image": group_json(&detail.image),
        "lore": group_json(&detail.lore),
        "info": group_json(&detail.info),
        "status": group_json(&detail.status),
    })
}

/// Render simplified page markup as terminal text: block elements start new
/// lines and list items get a bullet. Plain text passes through unchanged.
pub fn render_markup(markup: &str) -> String {
    let fragment = Html::parse_fragment(markup);
    let mut out = String::new();

    for node in fragment.root_element().descendants() {
        match node.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => match el.name() {
                "br" | "p" | "dd" | "tr" | "h1" | "h2" | "h3" | "h4" => out.push('\n'),
                "li" => out.push_str("\n• "),
                "td" | "th" => out.push(' '),
                _ => {}
            },
            _ => {}
        }
    }

    out.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
