//! Content/message data model shared by the registry, memory manager,
//! task runner, and replay engine.
//!
//! `Content` is a sum type: each variant carries the envelope fields
//! (`tag`, `lifespan`) alongside its own data, rather than hanging them
//! off a shared base class.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// Supported image MIME types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageMimeType {
    Png,
    Jpeg,
    Webp,
    Gif,
}

impl ImageMimeType {
    /// Detect the MIME type from an image's leading magic bytes.
    pub fn from_magic_bytes(bytes: &[u8]) -> Option<ImageMimeType> {
        if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(ImageMimeType::Png)
        } else if bytes.starts_with(b"\xff\xd8\xff") {
            Some(ImageMimeType::Jpeg)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(ImageMimeType::Gif)
        } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            Some(ImageMimeType::Webp)
        } else {
            None
        }
    }
}

/// Status of a tool execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolResultStatus {
    Success,
    Error,
    Skipped,
}

/// A tool call emitted by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallData {
    /// Some providers (OpenAI, Anthropic) assign an id; Gemini does not.
    pub id: Option<String>,
    pub name: String,
    /// Mapping of argument name to scalar/nested value.
    pub arguments: serde_json::Map<String, serde_json::Value>,
}

/// The outcome of executing a single tool call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResultData {
    pub tool_call_id: Option<String>,
    pub name: String,
    pub status: ToolResultStatus,
    pub error: Option<String>,
    pub description: String,
    /// If true, the batch that produced this result stops after it.
    pub terminal: bool,
}

/// A content part, tagged by variant. Every variant carries the shared
/// envelope (`tag` for filtering, `lifespan` for retention) inline.
///
/// `ToolCall`/`ToolResult` nest their payload as a `call`/`result` field
/// rather than flattening it: serde's internally-tagged enum representation
/// (`tag = "kind"`) doesn't support `#[serde(flatten)]` fields within a
/// variant, so the payload stays one level deep.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Content {
    Text {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        tag: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        lifespan: Option<NonZeroU32>,
    },
    Image {
        /// Base64-encoded bytes.
        data: String,
        mime: ImageMimeType,
        #[serde(skip_serializing_if = "Option::is_none")]
        tag: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        lifespan: Option<NonZeroU32>,
    },
    ToolCall {
        call: ToolCallData,
        #[serde(skip_serializing_if = "Option::is_none")]
        tag: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        lifespan: Option<NonZeroU32>,
    },
    ToolResult {
        result: ToolResultData,
        #[serde(skip_serializing_if = "Option::is_none")]
        tag: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        lifespan: Option<NonZeroU32>,
    },
}

impl Content {
    /// Plain text content with no tag/lifespan.
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text {
            text: text.into(),
            tag: None,
            lifespan: None,
        }
    }

    /// Image content, detecting the MIME type from magic bytes when possible.
    pub fn image(data_base64: impl Into<String>, raw_bytes: &[u8]) -> Self {
        let mime = ImageMimeType::from_magic_bytes(raw_bytes).unwrap_or(ImageMimeType::Png);
        Content::Image {
            data: data_base64.into(),
            mime,
            tag: None,
            lifespan: None,
        }
    }

    /// Image content with an explicit MIME type.
    pub fn image_with_mime(data_base64: impl Into<String>, mime: ImageMimeType) -> Self {
        Content::Image {
            data: data_base64.into(),
            mime,
            tag: None,
            lifespan: None,
        }
    }

    pub fn tool_call(
        id: Option<String>,
        name: impl Into<String>,
        arguments: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        Content::ToolCall {
            call: ToolCallData {
                id,
                name: name.into(),
                arguments,
            },
            tag: None,
            lifespan: None,
        }
    }

    pub fn tool_result(result: ToolResultData) -> Self {
        Content::ToolResult {
            result,
            tag: None,
            lifespan: None,
        }
    }

    /// Attach a tag, used for filtering by callers of `observe()`.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.set_tag(Some(tag.into()));
        self
    }

    /// Attach a lifespan: the maximum distance, in pairs from the newest,
    /// at which this content remains visible (see memory manager §4.3).
    pub fn with_lifespan(mut self, lifespan: u32) -> Self {
        self.set_lifespan(NonZeroU32::new(lifespan));
        self
    }

    fn set_tag(&mut self, new_tag: Option<String>) {
        match self {
            Content::Text { tag, .. }
            | Content::Image { tag, .. }
            | Content::ToolCall { tag, .. }
            | Content::ToolResult { tag, .. } => *tag = new_tag,
        }
    }

    fn set_lifespan(&mut self, new_lifespan: Option<NonZeroU32>) {
        match self {
            Content::Text { lifespan, .. }
            | Content::Image { lifespan, .. }
            | Content::ToolCall { lifespan, .. }
            | Content::ToolResult { lifespan, .. } => *lifespan = new_lifespan,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Content::Text { tag, .. }
            | Content::Image { tag, .. }
            | Content::ToolCall { tag, .. }
            | Content::ToolResult { tag, .. } => tag.as_deref(),
        }
    }

    pub fn lifespan(&self) -> Option<u32> {
        match self {
            Content::Text { lifespan, .. }
            | Content::Image { lifespan, .. }
            | Content::ToolCall { lifespan, .. }
            | Content::ToolResult { lifespan, .. } => lifespan.map(NonZeroU32::get),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text { text, .. } => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn as_tool_call(&self) -> Option<&ToolCallData> {
        match self {
            Content::ToolCall { call, .. } => Some(call),
            _ => None,
        }
    }

    pub fn as_tool_result(&self) -> Option<&ToolResultData> {
        match self {
            Content::ToolResult { result, .. } => Some(result),
            _ => None,
        }
    }
}

/// Role of a message in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Model,
}

/// A role-tagged message carrying a sequence of content parts.
///
/// The role constrains which variants are semantically meaningful: tool
/// calls only appear in `Model` messages, tool results only in `User`
/// messages. The type does not enforce this — it is an invariant upheld
/// by the task runner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Vec<Content>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: Vec<Content>) -> Self {
        Message {
            role,
            content,
            timestamp: Utc::now(),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Message::new(Role::System, vec![Content::text(text)])
    }

    pub fn user(content: Vec<Content>) -> Self {
        Message::new(Role::User, content)
    }

    pub fn model(content: Vec<Content>) -> Self {
        Message::new(Role::Model, content)
    }

    /// The tool calls contained in this message, in order (empty for
    /// non-model messages or a model message with no tool calls).
    pub fn tool_calls(&self) -> Vec<&ToolCallData> {
        self.content.iter().filter_map(Content::as_tool_call).collect()
    }

    /// The concatenated text of all `Text` parts, joined by a single space.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(Content::as_text)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_detection_from_magic_bytes() {
        assert_eq!(
            ImageMimeType::from_magic_bytes(b"\x89PNG\r\n\x1a\nrest"),
            Some(ImageMimeType::Png)
        );
        assert_eq!(
            ImageMimeType::from_magic_bytes(b"\xff\xd8\xffrest"),
            Some(ImageMimeType::Jpeg)
        );
        assert_eq!(
            ImageMimeType::from_magic_bytes(b"GIF89arest"),
            Some(ImageMimeType::Gif)
        );
        let mut webp = b"RIFF".to_vec();
        webp.extend_from_slice(b"\x00\x00\x00\x00");
        webp.extend_from_slice(b"WEBP");
        assert_eq!(ImageMimeType::from_magic_bytes(&webp), Some(ImageMimeType::Webp));
        assert_eq!(ImageMimeType::from_magic_bytes(b"not an image"), None);
    }

    #[test]
    fn lifespan_builder_rejects_zero_silently_to_none() {
        let c = Content::text("hi").with_lifespan(0);
        // NonZeroU32::new(0) is None, so a lifespan of 0 collapses to "unset".
        assert_eq!(c.lifespan(), None);
    }

    #[test]
    fn lifespan_and_tag_roundtrip() {
        let c = Content::text("hi").with_tag("observation").with_lifespan(2);
        assert_eq!(c.tag(), Some("observation"));
        assert_eq!(c.lifespan(), Some(2));
    }

    #[test]
    fn message_text_joins_text_parts_only() {
        let msg = Message::user(vec![
            Content::text("hello"),
            Content::tool_result(ToolResultData {
                tool_call_id: None,
                name: "noop".into(),
                status: ToolResultStatus::Success,
                error: None,
                description: "did nothing".into(),
                terminal: false,
            }),
            Content::text("world"),
        ]);
        assert_eq!(msg.text(), "hello world");
    }
}
