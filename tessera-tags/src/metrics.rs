//! Pixel math for the tag chip: rendered label text, intrinsic sizing,
//! bounded-fit clamping, and accessory placement.
//!
//! Everything here is pure so the sizing rules can be exercised without a
//! renderer. The chip's [`tessera_ui::layout::LayoutSpec`] feeds measured
//! child sizes in and applies the results.

use tessera_components::modifier::Padding;
use tessera_ui::{Px, PxPosition, PxSize};

/// Layout margins of a chip, resolved to physical pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChipMargins {
    /// Left margin.
    pub left: Px,
    /// Top margin.
    pub top: Px,
    /// Right margin.
    pub right: Px,
    /// Bottom margin.
    pub bottom: Px,
}

impl ChipMargins {
    /// Resolves dp-based padding into pixel margins.
    pub fn from_padding(padding: &Padding) -> Self {
        Self {
            left: padding.left.into(),
            top: padding.top.into(),
            right: padding.right.into(),
            bottom: padding.bottom.into(),
        }
    }

    fn horizontal(&self) -> Px {
        self.left + self.right
    }

    fn vertical(&self) -> Px {
        self.top + self.bottom
    }
}

/// The text a chip's label renders: `text + delimiter`.
///
/// The delimiter may be empty; it is never absent.
pub fn rendered_label(text: &str, delimiter: &str) -> String {
    let mut label = String::with_capacity(text.len() + delimiter.len());
    label.push_str(text);
    label.push_str(delimiter);
    label
}

/// The minimum size enclosing the label plus the configured accessory and
/// the layout margins.
///
/// Branch order is fixed: a close affordance wins over a leading icon, and
/// a chip configured with both still sizes by the close branch. Only the
/// close/leading width ever differs; height is always the label height plus
/// the vertical margins.
pub fn intrinsic_size(
    label: PxSize,
    leading: Option<PxSize>,
    close: Option<PxSize>,
    margins: &ChipMargins,
) -> PxSize {
    let height = label.height + margins.vertical();
    if let Some(close) = close {
        return PxSize::new(label.width + close.width + margins.horizontal(), height);
    }
    if let Some(leading) = leading {
        return PxSize::new(
            label.width + leading.width + margins.left + margins.left + margins.right,
            height,
        );
    }
    PxSize::new(label.width + margins.horizontal(), height)
}

/// Clamps an intrinsic size to the available width.
///
/// The height is deliberately left unchanged: the label never wraps or
/// truncates, so a narrower fit does not grow the chip vertically.
pub fn fit_within(intrinsic: PxSize, available_width: Px) -> PxSize {
    if intrinsic.width > available_width {
        PxSize::new(available_width, intrinsic.height)
    } else {
        intrinsic
    }
}

/// Where the label is placed: inset by the top/left margins.
pub(crate) fn label_origin(margins: &ChipMargins) -> PxPosition {
    PxPosition::new(margins.left, margins.top)
}

/// Where a trailing accessory (close affordance or leading icon) is placed:
/// a fixed inset back from the label's trailing edge, aligned to the top
/// margin, at the accessory's natural size.
pub(crate) fn trailing_accessory_origin(
    label_origin: PxPosition,
    label_width: Px,
    margins: &ChipMargins,
    trailing_inset: Px,
) -> PxPosition {
    PxPosition::new(label_origin.x + label_width - trailing_inset, margins.top)
}

/// Returns whether `pos` falls inside the rectangle at `origin` of `size`.
pub(crate) fn rect_contains(origin: PxPosition, size: PxSize, pos: PxPosition) -> bool {
    pos.x >= origin.x
        && pos.y >= origin.y
        && pos.x < origin.x + size.width
        && pos.y < origin.y + size.height
}

#[cfg(test)]
mod tests {
    use super::*;

    fn margins() -> ChipMargins {
        ChipMargins {
            left: Px(8),
            top: Px(8),
            right: Px(8),
            bottom: Px(8),
        }
    }

    #[test]
    fn rendered_label_concatenates_text_and_delimiter() {
        assert_eq!(rendered_label("ruby", ","), "ruby,");
        assert_eq!(rendered_label("ruby", ""), "ruby");
        assert_eq!(rendered_label("", ","), ",");
        assert_eq!(rendered_label("", ""), "");
    }

    #[test]
    fn bare_chip_size_is_label_plus_margins() {
        // The "ruby," scenario: width = label width + left + right margin.
        let label = PxSize::new(Px(40), Px(20));
        let size = intrinsic_size(label, None, None, &margins());
        assert_eq!(size, PxSize::new(Px(56), Px(36)));
    }

    #[test]
    fn close_branch_adds_close_width_and_single_left_margin() {
        let label = PxSize::new(Px(40), Px(20));
        let close = PxSize::new(Px(18), Px(18));
        let size = intrinsic_size(label, None, Some(close), &margins());
        assert_eq!(size, PxSize::new(Px(74), Px(36)));
    }

    #[test]
    fn leading_branch_adds_icon_width_and_doubled_left_margin() {
        let label = PxSize::new(Px(40), Px(20));
        let leading = PxSize::new(Px(18), Px(18));
        let size = intrinsic_size(label, Some(leading), None, &margins());
        assert_eq!(size, PxSize::new(Px(82), Px(36)));
    }

    #[test]
    fn close_branch_wins_when_both_accessories_are_configured() {
        let label = PxSize::new(Px(40), Px(20));
        let leading = PxSize::new(Px(30), Px(30));
        let close = PxSize::new(Px(18), Px(18));
        let both = intrinsic_size(label, Some(leading), Some(close), &margins());
        let close_only = intrinsic_size(label, None, Some(close), &margins());
        assert_eq!(both, close_only);
    }

    #[test]
    fn adding_an_accessory_strictly_widens_the_chip() {
        let label = PxSize::new(Px(40), Px(20));
        let accessory = PxSize::new(Px(18), Px(18));
        let bare = intrinsic_size(label, None, None, &margins());
        let with_close = intrinsic_size(label, None, Some(accessory), &margins());
        let with_leading = intrinsic_size(label, Some(accessory), None, &margins());
        assert!(with_close.width > bare.width);
        assert!(with_leading.width > bare.width);
        assert_eq!(bare.height, with_close.height);
        assert_eq!(bare.height, with_leading.height);
    }

    #[test]
    fn fit_within_clamps_width_and_keeps_height() {
        let intrinsic = PxSize::new(Px(120), Px(36));
        assert_eq!(
            fit_within(intrinsic, Px(100)),
            PxSize::new(Px(100), Px(36))
        );
        assert_eq!(fit_within(intrinsic, Px(120)), intrinsic);
        assert_eq!(fit_within(intrinsic, Px(200)), intrinsic);
    }

    #[test]
    fn trailing_accessory_is_anchored_back_from_the_label_edge() {
        let m = margins();
        let origin = label_origin(&m);
        assert_eq!(origin, PxPosition::new(Px(8), Px(8)));
        let accessory = trailing_accessory_origin(origin, Px(40), &m, Px(15));
        assert_eq!(accessory, PxPosition::new(Px(33), Px(8)));
    }

    #[test]
    fn rect_contains_is_half_open() {
        let origin = PxPosition::new(Px(10), Px(10));
        let size = PxSize::new(Px(20), Px(20));
        assert!(rect_contains(origin, size, PxPosition::new(Px(10), Px(10))));
        assert!(rect_contains(origin, size, PxPosition::new(Px(29), Px(29))));
        assert!(!rect_contains(origin, size, PxPosition::new(Px(30), Px(10))));
        assert!(!rect_contains(origin, size, PxPosition::new(Px(9), Px(15))));
    }
}
