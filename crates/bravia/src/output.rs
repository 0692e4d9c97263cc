//! Output formatting: table, JSON, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! JSON uses serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::OutputFormat;

// ── Shared rows ──────────────────────────────────────────────────────

/// A catalog entry: display name and the value sent to the TV.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct NamedValue {
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl NamedValue {
    pub fn from_map<'a>(map: impl IntoIterator<Item = (&'a String, &'a String)>) -> Vec<Self> {
        map.into_iter()
            .map(|(name, value)| Self {
                name: name.clone(),
                value: value.clone(),
            })
            .collect()
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json`: serializes the original data via serde
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted
/// string, since single-item detail views don't use `Tabled` derive.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Print a confirmation line to stderr, respecting quiet mode.
pub fn print_done(message: &str, quiet: bool) {
    if quiet {
        return;
    }
    if should_color() {
        eprintln!("{} {message}", "✓".green());
    } else {
        eprintln!("✓ {message}");
    }
}

/// Color only on an interactive stderr, and never with `NO_COLOR` set.
fn should_color() -> bool {
    io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// `Label:` + value lines for detail views, skipping missing values.
pub fn detail_lines<'a>(fields: impl IntoIterator<Item = (&'a str, Option<String>)>) -> String {
    fields
        .into_iter()
        .filter_map(|(label, value)| value.map(|v| format!("{:<11}{v}", format!("{label}:"))))
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Pretty-printed JSON.
fn render_json<T: Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_default()
}
