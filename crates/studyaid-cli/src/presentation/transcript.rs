//! Transcript entry rendering.

use console::style;
use studyaid_core::{Message, MessageId, Role};

use super::checks::format_checks;

const ERROR_PREFIX: &str = "Error: ";

/// 1-based position of `id` among assistant entries; the `N` of `/speak N`.
pub fn assistant_ordinal(messages: &[Message], id: MessageId) -> Option<usize> {
    messages
        .iter()
        .filter(|m| m.role() == Role::Assistant)
        .position(|m| m.id() == id)
        .map(|index| index + 1)
}

/// Render one entry. `ordinal` labels assistant replies.
pub fn format_message(message: &Message, ordinal: Option<usize>, show_checks: bool) -> String {
    match message.role() {
        Role::User => format!(
            "{} {}",
            style(format!("you (grade {}):", message.grade())).cyan().bold(),
            message.text()
        ),
        Role::Assistant if message.is_pending() => {
            style(format!("studyaid: {}", message.text())).dim().to_string()
        }
        Role::Assistant => {
            let label = ordinal.map_or_else(
                || "studyaid:".to_string(),
                |n| format!("[{n}] studyaid:"),
            );
            let label = style(label).green().bold();

            // Failed submissions carry no meta.
            if message.meta().is_none() && message.text().starts_with(ERROR_PREFIX) {
                return format!("{label} {}", style(message.text()).red());
            }

            let mut out = format!("{label} {}", message.text());
            if show_checks {
                if let Some(meta) = message.meta() {
                    out.push('\n');
                    out.push_str(&format_checks(meta));
                }
            }
            out
        }
    }
}
