//! The immutable tag value consumed by [`crate::tag_chip`].
//!
//! ## Usage
//!
//! Build a [`Tag`] from any string-like value and hand it to
//! [`crate::tag_chip::TagChipArgs::new`]. The chip copies the text out at
//! construction and never retains a reference to the original value.

/// An immutable piece of tag data: the text a chip displays.
///
/// `Tag` is a plain value owned by the caller. Where the text came from
/// (user input, a network payload, a fixture) is irrelevant to the chip.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tag {
    text: String,
}

impl Tag {
    /// Creates a tag from the given text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The text this tag displays.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl From<String> for Tag {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for Tag {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
