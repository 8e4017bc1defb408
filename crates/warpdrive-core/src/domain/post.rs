use serde::{Deserialize, Serialize};

/// Post entity - the metadata record for a single blog post.
///
/// The markdown body is deliberately not part of this record; it lives in the
/// content blob store keyed by `id`, so list views never drag post bodies
/// through memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub author: String,
    pub title: String,
    pub description: String,
    /// Creation time, milliseconds since the Unix epoch. Immutable.
    pub timestamp: i64,
    /// Empty, or a path/URL to an image.
    pub thumbnail: String,
}

/// Input for creating a post. `author` is stamped from the authenticated
/// caller by the HTTP layer, never taken from the request body.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub thumbnail: String,
}

/// Partial update for a post.
///
/// `None` means "leave unchanged"; `Some(String::new())` means "set to
/// empty". The distinction survives JSON deserialization because absent
/// fields default to `None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl PostPatch {
    /// True when no recognized field is present.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.author.is_none()
            && self.content.is_none()
            && self.thumbnail.is_none()
    }
}
