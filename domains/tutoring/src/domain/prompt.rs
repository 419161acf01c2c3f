//! Tutoring prompt assembly
//!
//! The provider receives one flat text prompt: a system instruction
//! parameterized by the learner's CEFR level, the recent history as
//! `SENDER: text` lines, and an explicit trailing turn marker.

use crate::domain::entities::Message;

/// Number of recent messages included in the prompt. Older history is
/// dropped, not summarized.
pub const HISTORY_WINDOW: usize = 10;

/// System instruction adapted to the learner's level; `None` becomes an
/// explicit "unknown" marker rather than being omitted.
pub fn system_instruction(level_code: Option<&str>) -> String {
    format!(
        "You are an English tutor AI assistant. Adapt responses to CEFR level: {}. \
         Use examples, short exercises, and vocabulary appropriate to the level.",
        level_code.unwrap_or("unknown")
    )
}

/// Build the full prompt from the recent history window and the new turn.
///
/// `history` is the most recent window of the conversation, oldest first,
/// and already contains the just-recorded user turn; the trailing `USER:`
/// line restates it ahead of the `ASSISTANT:` marker.
pub fn build_prompt(level_code: Option<&str>, history: &[Message], new_text: &str) -> String {
    let past_messages = history
        .iter()
        .map(|m| format!("{}: {}", m.sender.to_string().to_uppercase(), m.text))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{}\n\nConversation:\n{}\n\nUSER: {}\nASSISTANT:",
        system_instruction(level_code),
        past_messages,
        new_text
    )
}
