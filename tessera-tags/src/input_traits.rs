//! Input preferences published by a tag chip for the host IME integration.
//!
//! ## Usage
//!
//! A chip does not implement a keyboard; it only advertises how one should
//! behave while the chip holds focus. Hosts that bridge to a platform IME
//! read these values from [`crate::tag_chip::TagChipArgs::input_traits`].
//! The bundle is a set of static defaults, not runtime-negotiated state.

/// Automatic capitalization applied to typed text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Autocapitalization {
    /// Never capitalize automatically.
    #[default]
    None,
    /// Capitalize the first letter of each word.
    Words,
    /// Capitalize the first letter of each sentence.
    Sentences,
    /// Capitalize every character.
    AllCharacters,
}

/// Whether the host should offer autocorrection while the chip is focused.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Autocorrection {
    /// Let the host decide.
    Default,
    /// Autocorrection disabled.
    #[default]
    No,
    /// Autocorrection enabled.
    Yes,
}

/// Whether the host should spell-check text typed into the chip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpellChecking {
    /// Let the host decide.
    Default,
    /// Spell-checking disabled.
    #[default]
    No,
    /// Spell-checking enabled.
    Yes,
}

/// The kind of keyboard the host should present.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyboardKind {
    /// The host's standard keyboard.
    #[default]
    Default,
    /// ASCII-capable layout.
    AsciiCapable,
    /// Numeric layout.
    NumberPad,
    /// Layout tuned for email addresses.
    EmailAddress,
    /// Layout tuned for URLs.
    Url,
}

/// The action label shown on the keyboard's return key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReturnKeyKind {
    /// The host's standard return label.
    Default,
    /// "Next" — move to the following input.
    #[default]
    Next,
    /// "Done" — dismiss the keyboard.
    Done,
    /// "Go".
    Go,
    /// "Search".
    Search,
    /// "Send".
    Send,
}

/// The fixed bundle of keyboard preferences a tag chip publishes.
///
/// The defaults match what a tag token wants from an input method: no
/// autocapitalization, no autocorrection, no spell-checking, a standard
/// keyboard whose return key reads "Next", and no secure entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputTraits {
    /// Automatic capitalization preference.
    pub autocapitalization: Autocapitalization,
    /// Autocorrection preference.
    pub autocorrection: Autocorrection,
    /// Spell-checking preference.
    pub spell_checking: SpellChecking,
    /// Keyboard layout preference.
    pub keyboard: KeyboardKind,
    /// Return-key label preference.
    pub return_key: ReturnKeyKind,
    /// Whether the return key should enable itself only when text exists.
    pub enables_return_key_automatically: bool,
    /// Whether typed text should be obscured.
    pub secure_text_entry: bool,
}

impl Default for InputTraits {
    fn default() -> Self {
        Self {
            autocapitalization: Autocapitalization::None,
            autocorrection: Autocorrection::No,
            spell_checking: SpellChecking::No,
            keyboard: KeyboardKind::Default,
            return_key: ReturnKeyKind::Next,
            enables_return_key_automatically: false,
            secure_text_entry: false,
        }
    }
}
