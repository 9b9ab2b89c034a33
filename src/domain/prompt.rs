//! Prompt assembly - deterministic template construction.
//!
//! Two pure builders produce the system prompt injected after a context reset
//! and the structured per-turn payload, plus the bounded summarization of
//! recent local history that rides along on the first post-switch turn.

use crate::domain::chat::Message;
use crate::domain::intent::IntentLabel;

/// Fixed instructions injected into a freshly reset server context.
pub fn system_prompt() -> String {
    "You are the Playdex assistant, a video-game discovery companion. \
You only discuss video games: recommendations, game facts, and progression help. \
If a question is not about video games, politely refuse and steer the user back to games. \
Each user turn starts with an [Intent] header; shape your answer to it: \
'guide' means step-by-step progression help, 'info' means concise factual answers, \
'recommend' means tailored game suggestions with a short reason for each. \
Keep replies compact enough to read on a phone."
        .to_string()
}

/// Builds the structured payload for one user turn.
///
/// The `[Context Summary]` block is emitted only when a non-empty summary is
/// supplied; there are never empty headers.
pub fn user_payload(intent: IntentLabel, user_text: &str, context_summary: Option<&str>) -> String {
    let mut payload = format!("[Intent]\n{}", intent.as_str());

    if let Some(summary) = context_summary {
        if !summary.is_empty() {
            payload.push_str("\n\n[Context Summary]\n");
            payload.push_str(summary);
        }
    }

    payload.push_str("\n\n[User]\n");
    payload.push_str(user_text.trim());
    payload
}

/// Renders the most recent `count` messages into a bounded digest.
///
/// Each message becomes `"<Role>: <single-line text>"` with newlines
/// flattened to spaces; lines are joined with newlines and the result is
/// prefix-truncated to `max_chars`. Returns `None` for empty history.
pub fn summarize_context(
    messages: &[Message],
    count: usize,
    max_chars: usize,
) -> Option<String> {
    if messages.is_empty() || count == 0 {
        return None;
    }

    let start = messages.len().saturating_sub(count);
    let rendered = messages[start..]
        .iter()
        .map(|m| {
            let flat = m.text.replace(['\n', '\r'], " ");
            format!("{}: {}", m.author.display_name(), flat)
        })
        .collect::<Vec<_>>()
        .join("\n");

    Some(truncate_chars(&rendered, max_chars))
}

/// Prefix-truncates to at most `max_chars` characters.
///
/// Deterministic and idempotent: truncating an already-truncated string is a
/// no-op. Counts characters, not bytes, so multi-byte text never splits.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}
