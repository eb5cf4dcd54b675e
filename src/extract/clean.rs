use scraper::{CaseSensitivity, ElementRef};

/// Elements dropped with their whole subtree
const DROPPED_TAGS: [&str; 5] = ["script", "style", "noscript", "iframe", "form"];

/// Wiki chrome that carries no card content
const DROPPED_CLASSES: [&str; 8] = [
    "mw-editsection",
    "toc",
    "navbox",
    "printfooter",
    "reference",
    "references",
    "noprint",
    "wikia-gallery",
];

const KEPT_ATTRIBUTES: [&str; 4] = ["href", "src", "alt", "title"];

const VOID_TAGS: [&str; 6] = ["br", "hr", "img", "wbr", "col", "source"];

/// Serialize the children of `element` into simplified markup: structural
/// tags and links survive, presentation attributes, comments, scripts and
/// wiki chrome do not.
pub fn cleaned_html(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    write_children(element, &mut out);
    out.trim().to_string()
}

fn write_children(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            write_element(child_element, out);
        } else if let Some(text) = child.value().as_text() {
            escape_into(text, out, false);
        }
    }
}

fn write_element(element: ElementRef<'_>, out: &mut String) {
    let value = element.value();
    let name = value.name();

    if DROPPED_TAGS.contains(&name)
        || DROPPED_CLASSES
            .iter()
            .any(|class| value.has_class(class, CaseSensitivity::CaseSensitive))
    {
        return;
    }

    out.push('<');
    out.push_str(name);
    for (attribute, attribute_value) in value.attrs() {
        if KEPT_ATTRIBUTES.contains(&attribute) {
            out.push(' ');
            out.push_str(attribute);
            out.push_str("=\"");
            escape_into(attribute_value, out, true);
            out.push('"');
        }
    }
    out.push('>');

    if VOID_TAGS.contains(&name) {
        return;
    }

    write_children(element, out);
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn escape_into(text: &str, out: &mut String, attribute: bool) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
