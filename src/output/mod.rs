pub mod table;

use serde::Serialize;

use crate::model::Address;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Xml,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" | "table" => Some(Self::Text),
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".xml") {
        return Some(OutputFormat::Xml);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

#[derive(Clone, Debug, Serialize)]
pub struct PageExport<'a> {
    pub page: u64,
    pub page_size: u64,
    pub total_count: u64,
    pub query: &'a str,
    pub addresses: Vec<&'a Address>,
}

pub fn render(format: OutputFormat, export: &PageExport<'_>) -> Vec<u8> {
    match format {
        OutputFormat::Text => render_text(export),
        OutputFormat::Json => render_json(export),
        OutputFormat::Xml => render_xml(export),
    }
}

pub fn render_text(export: &PageExport<'_>) -> Vec<u8> {
    let mut out = table::render_table(&export.addresses, false);
    out.push_str(&format!(
        "page {} of {} ({} records)\n",
        export.page,
        crate::window::page_count(export.page_size, export.total_count),
        export.total_count
    ));
    out.into_bytes()
}

pub fn render_json(export: &PageExport<'_>) -> Vec<u8> {
    serde_json::to_vec_pretty(export).unwrap_or_else(|_| b"{}\n".to_vec())
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

pub fn render_xml(export: &PageExport<'_>) -> Vec<u8> {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    out.push('\n');
    out.push_str(&format!(
        "<page number=\"{}\" size=\"{}\" total=\"{}\" query=\"{}\">\n",
        export.page,
        export.page_size,
        export.total_count,
        escape_xml(export.query)
    ));
    for a in &export.addresses {
        out.push_str(&format!("  <address id=\"{}\">\n", a.id));
        out.push_str(&format!(
            "    <first_name>{}</first_name>\n",
            escape_xml(&a.first_name)
        ));
        out.push_str(&format!(
            "    <last_name>{}</last_name>\n",
            escape_xml(&a.last_name)
        ));
        out.push_str(&format!("    <street>{}</street>\n", escape_xml(&a.street)));
        out.push_str(&format!(
            "    <postcode>{}</postcode>\n",
            escape_xml(&a.postcode)
        ));
        out.push_str(&format!("    <state>{}</state>\n", escape_xml(&a.state)));
        out.push_str(&format!(
            "    <country>{}</country>\n",
            escape_xml(&a.country)
        ));
        out.push_str("  </address>\n");
    }
    out.push_str("</page>\n");
    out.into_bytes()
}
