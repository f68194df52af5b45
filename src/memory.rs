//! Conversation memory manager — sliding-window retention, textual
//! compaction of evicted iterations, and per-content lifespan filtering.

use crate::content::{Content, Message, Role, ToolResultStatus};

/// One (model, user) iteration exchange — the atomic unit of progress.
pub type Pair = (Message, Message);

/// Sliding-window memory configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryConfig {
    /// Number of most-recent pairs retained in full detail. Older pairs
    /// are textually compacted. Must be `>= 1`.
    pub recent_window: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        MemoryConfig { recent_window: 5 }
    }
}

impl MemoryConfig {
    /// Construct a config, clamping `recent_window` up to 1.
    pub fn new(recent_window: usize) -> Self {
        MemoryConfig {
            recent_window: recent_window.max(1),
        }
    }
}

/// Build a bullet-list summary of a run of pairs.
///
/// For each pair: the model message's text (if any) becomes a top-level
/// bullet, with continuation lines indented; each tool result in the
/// pair's user message becomes an indented bullet, annotated with
/// `[FAILED: <error>]` on error.
pub fn compact(pairs: &[Pair]) -> String {
    let mut lines: Vec<String> = Vec::new();

    for (model_msg, user_msg) in pairs {
        let text = model_msg.text();
        if !text.is_empty() {
            let mut reasoning_lines = text.trim().split('\n');
            if let Some(first) = reasoning_lines.next() {
                lines.push(format!("- {}", first));
            }
            for line in reasoning_lines {
                lines.push(format!("  {}", line));
            }
        }

        for content in &user_msg.content {
            if let Some(result) = content.as_tool_result() {
                if result.status == ToolResultStatus::Error {
                    lines.push(format!(
                        "  - {} [FAILED: {}]",
                        result.description,
                        result.error.as_deref().unwrap_or_default()
                    ));
                } else {
                    lines.push(format!("  - {}", result.description));
                }
            }
        }
    }

    lines.join("\n")
}

/// Apply lifespan filtering to a single recent pair's user message.
///
/// `distance` is the number of pairs between this one and the newest pair
/// in the recent window (0 = newest). Content with no lifespan is always
/// kept; content with `lifespan <= distance` is dropped. An empty result
/// is preserved as an empty message, never elided.
fn filter_lifespan(user_msg: &Message, distance: u32) -> Message {
    let content: Vec<Content> = user_msg
        .content
        .iter()
        .filter(|c| match c.lifespan() {
            None => true,
            Some(lifespan) => distance < lifespan,
        })
        .cloned()
        .collect();

    Message {
        role: Role::User,
        content,
        timestamp: user_msg.timestamp,
    }
}

/// Assemble the message sequence fed to the next model call: bootstrap
/// messages, an optional compacted summary of older pairs, then the
/// recent pairs with lifespan filtering applied to each pair's user
/// message.
pub fn assemble_messages(
    bootstrap: &[Message],
    pairs: &[Pair],
    config: &MemoryConfig,
) -> Vec<Message> {
    let recent_window = config.recent_window;
    let mut messages: Vec<Message> = bootstrap.to_vec();

    let (old, recent): (&[Pair], &[Pair]) = if pairs.len() > recent_window {
        pairs.split_at(pairs.len() - recent_window)
    } else {
        (&[], pairs)
    };

    if !old.is_empty() {
        let summary = compact(old);
        if !summary.is_empty() {
            messages.push(Message::user(vec![Content::text(format!(
                "Previous actions in this session:\n{}",
                summary
            ))]));
        }
    }

    let n = recent.len();
    for (i, (model_msg, user_msg)) in recent.iter().enumerate() {
        let distance = (n - 1 - i) as u32;
        messages.push(model_msg.clone());
        messages.push(filter_lifespan(user_msg, distance));
    }

    messages
}
