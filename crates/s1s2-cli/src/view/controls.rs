use std::fmt::Write as _;

use s1s2_core::{ControlId, ControlKind, ControlState, Dataset, ImpactLevel};

use super::escape;

/// Render two selects per row, each pre-selected from the control state.
///
/// Select ids follow [`ControlId`]'s display form (`esg-0`, `financial-0`);
/// `data-kind` and `data-row` carry the same address for the page script.
pub fn render(dataset: &Dataset, controls: &ControlState) -> String {
    let mut out = String::from(r#"<div class="controls">"#);
    for (row, risk) in dataset.rows().iter().enumerate() {
        out.push_str(r#"<div class="control-row">"#);
        for kind in ControlKind::ALL {
            let id = ControlId::new(kind, row);
            let selected = controls.get(id).unwrap_or(ImpactLevel::Low);
            let _ = write!(
                out,
                r#"<label for="{id}">{risk} {title}:</label><select id="{id}" data-kind="{kind}" data-row="{row}">"#,
                risk = escape(&risk.risk_name),
                title = kind.title(),
            );
            for level in ImpactLevel::ALL {
                let _ = write!(
                    out,
                    r#"<option value="{score}"{sel}>{label}</option>"#,
                    score = level.to_score(),
                    sel = if level == selected { " selected" } else { "" },
                    label = level.as_str(),
                );
            }
            out.push_str("</select>");
        }
        out.push_str("</div>");
    }
    out.push_str("</div>");
    out
}
