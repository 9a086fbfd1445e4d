//! Results handed back to invocation callers.

use serde::{Deserialize, Serialize};

/// Outcome of a tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResponse {
    /// Whether the invocation failed.
    pub is_error: bool,
    /// Text content items.
    pub contents: Vec<String>,
}

impl ToolResponse {
    /// Creates a successful response.
    #[must_use]
    pub const fn success(contents: Vec<String>) -> Self {
        Self {
            is_error: false,
            contents,
        }
    }

    /// Creates a failed response with a single message.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            is_error: true,
            contents: vec![message.into()],
        }
    }
}

/// One content item of a resource read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceContents {
    /// URI the caller asked for.
    pub uri: String,
    /// Text content.
    pub text: String,
    /// MIME type of `text`.
    pub mime_type: String,
}

impl ResourceContents {
    /// Creates a content item.
    #[must_use]
    pub fn new(
        uri: impl Into<String>,
        text: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            text: text.into(),
            mime_type: mime_type.into(),
        }
    }
}
