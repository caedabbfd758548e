use std::fmt::Write as _;

use s1s2_core::TablePage;

use super::escape;

/// Render one page of the data grid with pager buttons.
///
/// Cells show the row labels as loaded, not the current control values.
pub fn render(page: &TablePage) -> String {
    let mut out = String::from(
        r#"<table class="grid"><thead><tr><th>Risk</th><th>ESG impact</th><th>Financial impact</th></tr></thead><tbody>"#,
    );
    for row in &page.rows {
        let _ = write!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&row.risk_name),
            escape(&row.esg_label),
            escape(&row.financial_label),
        );
    }
    out.push_str("</tbody></table>");

    let _ = write!(
        out,
        r#"<div class="pager"><button type="button" data-page="{prev}"{prev_disabled}>&lsaquo; Prev</button><span>Page {current} of {count} ({total} rows)</span><button type="button" data-page="{next}"{next_disabled}>Next &rsaquo;</button></div>"#,
        prev = page.page.saturating_sub(1),
        next = page.page + 1,
        prev_disabled = if page.has_previous() { "" } else { " disabled" },
        next_disabled = if page.has_next() { "" } else { " disabled" },
        current = page.page + 1,
        count = page.page_count,
        total = page.total_rows,
    );
    out
}
