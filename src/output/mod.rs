pub mod formatter;

pub use formatter::{render_markup, Formatter};

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::router::{CardData, CardDetail, CardQuery, DataSource};

/// Format the answer to one card query based on the specified format
pub fn format_card_data(name: &str, query: CardQuery, data: &CardData, format: OutputFormat) -> Result<String> {
    Formatter::new(format).format_card_data(name, query, data)
}

/// Format card names based on the specified format
pub fn format_card_names(names: &[String], total: usize, source: DataSource, format: OutputFormat) -> Result<String> {
    Formatter::new(format).format_names(names, total, source)
}

/// Format a fully loaded card based on the specified format
pub fn format_card_detail(detail: &CardDetail, format: OutputFormat, show_image_hint: bool) -> Result<String> {
    Formatter::new(format).format_detail(detail, show_image_hint)
}
