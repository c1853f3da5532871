//! Text and JSON renderings of the browser's current rows.

use asset_browser_core::browser::AssetBrowser;
use asset_browser_core::clock::Clock;
use asset_browser_core::metadata::MetadataProvider;
use chrono::{DateTime, Local, Utc};
use serde_json::{json, Value};
use std::fmt::Write;

const INDENT: &str = "  ";

/// One-line header describing the active selections.
pub fn header<P: MetadataProvider, C: Clock>(browser: &AssetBrowser<P, C>) -> String {
    let view = browser.view();
    let mut line = format!(
        "{} | {} ({})",
        view.time_range.label(),
        view.sort_key.label(),
        view.sort_direction.label()
    );
    if !view.search.is_empty() {
        let _ = write!(line, " | search: {:?}", view.search);
    }
    if let Some(summary) = browser.last_refresh() {
        let _ = write!(line, " | {} of {} file(s)", summary.kept, summary.enumerated);
    }
    line
}

/// Indented tree listing. Directories are marked `[-]` when open and `[+]`
/// when closed; leaves show their creation time.
pub fn render_text<P: MetadataProvider, C: Clock>(browser: &AssetBrowser<P, C>) -> String {
    let mut out = header(browser);
    out.push('\n');

    let rows = browser.rows();
    if rows.is_empty() {
        out.push_str("(no recent assets)\n");
        return out;
    }

    let searching = !browser.search().is_empty();
    let tree = browser.tree();
    for row in rows {
        let Some(node) = tree.get(row.id) else {
            continue;
        };
        let depth = usize::try_from(row.depth).unwrap_or(0);
        out.push_str(&INDENT.repeat(depth));
        if node.is_dir() {
            let marker = if searching || node.is_expanded() { "[-]" } else { "[+]" };
            let _ = writeln!(out, "{} {}/", marker, node.name);
        } else {
            let created = browser
                .created_at(node.id)
                .map(format_local)
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(out, "    {}  {}", node.name, created);
        }
    }
    out
}

/// Same rows as [`render_text`], as a JSON document.
pub fn render_json<P: MetadataProvider, C: Clock>(browser: &AssetBrowser<P, C>) -> Value {
    let view = browser.view();
    let tree = browser.tree();
    let rows: Vec<Value> = browser
        .rows()
        .into_iter()
        .filter_map(|row| {
            let node = tree.get(row.id)?;
            Some(if node.is_dir() {
                json!({
                    "kind": "dir",
                    "name": node.name,
                    "path": node.key,
                    "depth": row.depth,
                    "expanded": node.is_expanded(),
                })
            } else {
                json!({
                    "kind": "asset",
                    "name": node.name,
                    "path": node.payload_path,
                    "depth": row.depth,
                    "created": browser.created_at(node.id).map(|t| t.to_rfc3339()),
                })
            })
        })
        .collect();

    json!({
        "time_range": view.time_range.name(),
        "sort_key": view.sort_key.name(),
        "sort_direction": view.sort_direction.name(),
        "search": view.search,
        "refresh": browser.last_refresh(),
        "expanded": browser.expansion().iter().map(|k| k.as_str()).collect::<Vec<_>>(),
        "rows": rows,
    })
}

fn format_local(t: DateTime<Utc>) -> String {
    t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Either rendering as a printable string.
pub fn render_view<P: MetadataProvider, C: Clock>(
    browser: &AssetBrowser<P, C>,
    json: bool,
) -> serde_json::Result<String> {
    if json {
        serde_json::to_string_pretty(&render_json(browser))
    } else {
        Ok(render_text(browser))
    }
}
