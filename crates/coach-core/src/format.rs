//! Flattens a conversation into the single text prompt sent upstream.
//!
//! The completion API receives one text block rather than a structured list
//! of messages. Each turn becomes one line of the form `[role] content`,
//! preceded by the persona preamble as a `[system]` line.

use crate::types::{ChatTurn, Role};

/// Instructional preamble prepended to every prompt.
pub const PERSONA: &str = "You are Run.AI Coach, a friendly, concise athletic assistant for a club fair. \
Help students with running advice, training tips, and motivation. \
Keep answers short, practical, and positive.";

/// Render `persona` followed by `history`, one `[role] content` line per turn.
///
/// Content is copied as-is: empty content yields a line with nothing after
/// the tag's trailing space.
pub fn format_history(persona: &str, history: &[ChatTurn]) -> String {
    let system = ChatTurn::new(Role::System, persona);
    std::iter::once(&system)
        .chain(history)
        .map(|turn| format!("{} {}", turn.role.prompt_tag(), turn.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full prompt for one exchange: the formatted history, the current user
/// message and an open assistant turn for the model to complete.
pub fn build_prompt(persona: &str, history: &[ChatTurn], message: &str) -> String {
    format!(
        "{}\n[user] {}\n[assistant]",
        format_history(persona, history),
        message
    )
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_history_is_persona_only() {
        assert_eq!(format_history("be nice", &[]), "[system] be nice");
    }

    #[test]
    fn output_starts_with_persona_line() {
        let history = vec![ChatTurn::system("override"), ChatTurn::user("hi")];
        let text = format_history(PERSONA, &history);
        assert!(text.starts_with(&format!("[system] {PERSONA}")));
    }

    #[test]
    fn lines_follow_input_order() {
        let history = vec![
            ChatTurn::user("hi"),
            ChatTurn::assistant("hello"),
            ChatTurn::new(Role::Other("tool".into()), "result"),
            ChatTurn::system("note"),
        ];
        assert_eq!(
            format_history("p", &history),
            "[system] p\n[user] hi\n[assistant] hello\n[user] result\n[system] note"
        );
    }

    #[test]
    fn empty_content_keeps_the_line() {
        let text = format_history("p", &[ChatTurn::user("")]);
        assert_eq!(text, "[system] p\n[user] ");
    }

    #[test]
    fn formatting_is_deterministic() {
        let history = vec![ChatTurn::user("a"), ChatTurn::assistant("b")];
        assert_eq!(format_history(PERSONA, &history), format_history(PERSONA, &history));
    }

    #[test]
    fn prompt_appends_message_and_assistant_marker() {
        let prompt = build_prompt("p", &[ChatTurn::user("hi")], "how far?");
        assert_eq!(prompt, "[system] p\n[user] hi\n[user] how far?\n[assistant]");
    }
}
