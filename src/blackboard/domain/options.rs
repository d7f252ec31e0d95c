//! Optional write parameters.

use super::Confidence;
use std::collections::BTreeSet;

/// Confidence and tags attached to a write.
///
/// # Examples
///
/// ```
/// use concord::blackboard::domain::WriteOptions;
///
/// let options = WriteOptions::new().with_confidence(0.9).with_tag("schema");
/// assert_eq!(options.confidence().value(), 0.9);
/// assert!(options.tags().contains("schema"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteOptions {
    confidence: Confidence,
    tags: BTreeSet<String>,
}

impl WriteOptions {
    /// Creates options with the default confidence and no tags.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the confidence, clamped into `[0, 1]`.
    #[must_use]
    pub const fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Confidence::new(confidence);
        self
    }

    /// Adds one tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Adds several tags.
    #[must_use]
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Returns the confidence.
    #[must_use]
    pub const fn confidence(&self) -> Confidence {
        self.confidence
    }

    /// Returns the tags.
    #[must_use]
    pub const fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub(crate) fn into_parts(self) -> (Confidence, BTreeSet<String>) {
        (self.confidence, self.tags)
    }
}
