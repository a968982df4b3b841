use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Table};

use crate::model::{Address, MenuItem};
use crate::pager::{CountStatus, PagerState};

const HEADERS: [&str; 6] = [
    "First Name",
    "Last Name",
    "Street",
    "Postcode",
    "State",
    "Country",
];

fn cells(a: &Address) -> [&str; 6] {
    [
        a.first_name.as_str(),
        a.last_name.as_str(),
        a.street.as_str(),
        a.postcode.as_str(),
        a.state.as_str(),
        a.country.as_str(),
    ]
}

pub fn render_table(addresses: &[&Address], color: bool) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    if color {
        table.enforce_styling();
        table.set_header(
            HEADERS
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );
    } else {
        table.force_no_tty();
        table.set_header(HEADERS);
    }
    for a in addresses {
        table.add_row(cells(a));
    }

    let mut out = format!("{table}\n");
    if addresses.is_empty() {
        out.push_str("(no addresses)\n");
    }
    out
}

pub fn render_menu(items: &[MenuItem], color: bool) -> String {
    if items.is_empty() {
        return String::new();
    }
    let rendered = items
        .iter()
        .map(|m| {
            if color {
                format!("{} ({})", m.menu_item.bold().blue(), m.href.dimmed())
            } else {
                format!("{} ({})", m.menu_item, m.href)
            }
        })
        .collect::<Vec<_>>()
        .join(" | ");
    format!("{rendered}\n")
}

fn control(label: &str, enabled: bool, color: bool) -> String {
    match (enabled, color) {
        (true, true) => format!("[{}]", label.bold().white()),
        (false, true) => format!("[{}]", label.dimmed()),
        (true, false) => format!("[{label}]"),
        (false, false) => format!("({label})"),
    }
}

pub fn render_controls(state: &PagerState, shown: usize, color: bool) -> String {
    let mut parts: Vec<String> = vec![control("prev", state.can_previous(), color)];
    let pages = match state.count_status() {
        CountStatus::Pending => "?".to_string(),
        _ => state.page_count().to_string(),
    };
    parts.push(format!("page {} of {}", state.current_page(), pages));
    parts.push(control("next", state.can_next(), color));
    parts.push(format!("{} records", state.total_count()));
    if !state.query().is_empty() {
        parts.push(format!(
            "street ~ '{}' ({} of {} shown)",
            state.query(),
            shown,
            state.addresses().len()
        ));
    }
    if !state.failed_ids().is_empty() {
        let missing = format!("{} unavailable", state.failed_ids().len());
        parts.push(if color {
            missing.yellow().to_string()
        } else {
            missing
        });
    }
    if state.is_loading() {
        parts.push("loading...".to_string());
    }
    format!("{}\n", parts.join("  "))
}
