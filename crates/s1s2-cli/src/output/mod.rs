use serde::Serialize;

use crate::cli::OutputFormat;

pub mod table;

/// A response that also has a row-oriented terminal rendering.
pub trait TableView {
    const HEADERS: &'static [&'static str];

    fn table_rows(&self) -> Vec<Vec<String>>;
}

/// Render a response to a string in the requested format.
pub fn render<T: Serialize + TableView>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => Ok(render_table(value, table::TableOptions::from_env())),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a response in the requested format.
pub fn output<T: Serialize + TableView>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn render_table<T: TableView>(value: &T, options: table::TableOptions) -> String {
    let rows = value.table_rows();
    if rows.is_empty() {
        return String::from("(no rows)");
    }
    table::render_rows(T::HEADERS, &rows, options)
}
