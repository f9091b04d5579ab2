//! Fact-check rendering.

use console::style;
use studyaid_core::FactChecks;

/// Render the backend's `checks` payload under a reply.
///
/// Non-object payloads are shown as compact JSON.
pub fn format_checks(raw: &serde_json::Value) -> String {
    let Some(checks) = FactChecks::from_value(raw) else {
        return style(format!("  checks: {raw}")).dim().to_string();
    };

    let mut lines = Vec::new();
    if checks.is_faithful() {
        let kept = style("  checks: all numbers and names kept").green();
        lines.push(kept.to_string());
    } else {
        if !checks.missing_numbers.is_empty() {
            lines.push(
                style(format!(
                    "  missing numbers: {}",
                    checks.missing_numbers.join(", ")
                ))
                .red()
                .to_string(),
            );
        }
        if !checks.missing_entities.is_empty() {
            lines.push(
                style(format!(
                    "  missing names: {}",
                    checks.missing_entities.join(", ")
                ))
                .red()
                .to_string(),
            );
        }
    }
    if !checks.used_spacy {
        lines.push(style("  (names found by heuristic)").dim().to_string());
    }
    lines.join("\n")
}
