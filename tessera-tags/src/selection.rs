//! The selection/focus state machine and its transition animation.
//!
//! Selection and focus are two booleans, but they are only ever mutated
//! through [`transition`], which enforces the single-selection sync rule in
//! one place. Callers apply the returned [`FocusDirective`] to the real
//! [`tessera_ui::Focus`] handle; the actual grant is reconciled by feeding
//! [`SelectionInput::FocusGranted`] / [`SelectionInput::FocusLost`] back in
//! on the next frame.

use std::time::{Duration, Instant};

use crate::animation::easing;

/// How long the color swap and scale pop run when entering or leaving the
/// selected state.
pub(crate) const SELECT_POP_DURATION: Duration = Duration::from_millis(200);
/// How long the settle from the popped scale back to identity runs.
pub(crate) const SELECT_SETTLE_DURATION: Duration = Duration::from_millis(100);
/// Uniform scale applied at the peak of the selection pop.
pub(crate) const SELECT_POP_SCALE: f32 = 1.15;

/// The two facets of a chip's interactive state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SelectionFlags {
    /// The chip's own display/semantic flag.
    pub selected: bool,
    /// The last observed focus grant.
    pub focused: bool,
}

/// Events that may mutate [`SelectionFlags`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SelectionInput {
    /// External assignment of the `selected` flag.
    SetSelected(bool),
    /// The platform granted this chip focus.
    FocusGranted,
    /// The platform revoked this chip's focus.
    FocusLost,
}

/// What the caller should do with its focus handle after a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FocusDirective {
    /// Request focus for the chip.
    Claim,
    /// Release focus held by the chip.
    Release,
    /// Leave focus untouched.
    Keep,
}

/// Applies one input to the flags and reports the focus side effect.
///
/// In multi-selection mode `selected` is a pure display flag: external
/// assignment never touches focus, and focus changes never touch
/// `selected`. In single-selection mode the two are kept equal, with either
/// side able to drive the other.
pub(crate) fn transition(
    flags: &mut SelectionFlags,
    input: SelectionInput,
    multi_selection: bool,
) -> FocusDirective {
    match input {
        SelectionInput::SetSelected(selected) => {
            flags.selected = selected;
            if multi_selection {
                return FocusDirective::Keep;
            }
            if selected && !flags.focused {
                FocusDirective::Claim
            } else if !selected && flags.focused {
                FocusDirective::Release
            } else {
                FocusDirective::Keep
            }
        }
        SelectionInput::FocusGranted => {
            flags.focused = true;
            if !multi_selection {
                flags.selected = true;
            }
            FocusDirective::Keep
        }
        SelectionInput::FocusLost => {
            flags.focused = false;
            if !multi_selection {
                flags.selected = false;
            }
            FocusDirective::Keep
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum AnimPhase {
    Idle,
    /// Color swap plus, when entering the selected state, the scale pop.
    Pop { to_selected: bool, started: Instant },
    /// Easing the popped scale back to identity.
    Settle { started: Instant },
}

/// Epoch-countered animation state for selection transitions.
///
/// Every transition bumps a monotonic epoch and replaces the timeline
/// wholesale, so a settle scheduled by an earlier transition can never
/// clobber a newer one. The settle only runs if the latest `selected`
/// value is still true when the pop completes; the terminal scale is
/// always exactly 1.0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SelectionAnimation {
    epoch: u64,
    phase: AnimPhase,
}

impl Default for SelectionAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionAnimation {
    pub(crate) fn new() -> Self {
        Self {
            epoch: 0,
            phase: AnimPhase::Idle,
        }
    }

    /// Starts a new transition timeline, invalidating any pending settle.
    pub(crate) fn begin(&mut self, to_selected: bool, now: Instant) {
        self.epoch = self.epoch.wrapping_add(1);
        self.phase = AnimPhase::Pop {
            to_selected,
            started: now,
        };
    }

    /// The number of transitions started so far.
    pub(crate) fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Advances phase boundaries and reports whether the timeline is live.
    ///
    /// `latest_selected` is the chip's current flag; the settle phase is
    /// only entered when it is still true at pop completion.
    pub(crate) fn advance(&mut self, now: Instant, latest_selected: bool) -> bool {
        match self.phase {
            AnimPhase::Idle => false,
            AnimPhase::Pop {
                to_selected,
                started,
            } => {
                if now.duration_since(started) >= SELECT_POP_DURATION {
                    self.phase = if to_selected && latest_selected {
                        AnimPhase::Settle { started: now }
                    } else {
                        AnimPhase::Idle
                    };
                }
                self.phase != AnimPhase::Idle
            }
            AnimPhase::Settle { started } => {
                if now.duration_since(started) >= SELECT_SETTLE_DURATION {
                    self.phase = AnimPhase::Idle;
                }
                self.phase != AnimPhase::Idle
            }
        }
    }

    /// Eased progress of the color swap toward the current pair, in
    /// [0.0, 1.0]. Outside the pop phase the swap is complete.
    pub(crate) fn color_progress(&self, now: Instant) -> f32 {
        match self.phase {
            AnimPhase::Pop { started, .. } => easing(fraction(started, now, SELECT_POP_DURATION)),
            _ => 1.0,
        }
    }

    /// The uniform scale to apply right now.
    ///
    /// The pop only scales when the chip is entering, and still holds,
    /// the selected state; leaving it swaps colors at identity scale.
    pub(crate) fn scale(&self, now: Instant, latest_selected: bool) -> f32 {
        match self.phase {
            AnimPhase::Pop {
                to_selected: true,
                started,
            } if latest_selected => {
                1.0 + (SELECT_POP_SCALE - 1.0) * easing(fraction(started, now, SELECT_POP_DURATION))
            }
            AnimPhase::Settle { started } => {
                SELECT_POP_SCALE
                    + (1.0 - SELECT_POP_SCALE)
                        * easing(fraction(started, now, SELECT_SETTLE_DURATION))
            }
            _ => 1.0,
        }
    }
}

fn fraction(started: Instant, now: Instant, duration: Duration) -> f32 {
    (now.duration_since(started).as_secs_f32() / duration.as_secs_f32()).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> Instant {
        Instant::now()
    }

    #[test]
    fn single_selection_claims_focus_on_select() {
        let mut flags = SelectionFlags::default();
        let directive = transition(&mut flags, SelectionInput::SetSelected(true), false);
        assert_eq!(directive, FocusDirective::Claim);
        assert!(flags.selected);
        // The grant has not been observed yet.
        assert!(!flags.focused);
        let directive = transition(&mut flags, SelectionInput::FocusGranted, false);
        assert_eq!(directive, FocusDirective::Keep);
        assert!(flags.focused);
    }

    #[test]
    fn single_selection_releases_focus_on_deselect() {
        let mut flags = SelectionFlags {
            selected: true,
            focused: true,
        };
        let directive = transition(&mut flags, SelectionInput::SetSelected(false), false);
        assert_eq!(directive, FocusDirective::Release);
        let directive = transition(&mut flags, SelectionInput::FocusLost, false);
        assert_eq!(directive, FocusDirective::Keep);
        assert!(!flags.selected);
        assert!(!flags.focused);
    }

    #[test]
    fn focus_back_edge_drives_selection() {
        let mut flags = SelectionFlags::default();
        transition(&mut flags, SelectionInput::FocusGranted, false);
        assert!(flags.selected);
        transition(&mut flags, SelectionInput::FocusLost, false);
        assert!(!flags.selected);
    }

    #[test]
    fn multi_selection_never_touches_focus() {
        let mut flags = SelectionFlags::default();
        let directive = transition(&mut flags, SelectionInput::SetSelected(true), true);
        assert_eq!(directive, FocusDirective::Keep);
        assert!(flags.selected);
        assert!(!flags.focused);

        // Focus changes leave the display flag alone in multi-selection.
        transition(&mut flags, SelectionInput::FocusGranted, true);
        assert!(flags.focused);
        transition(&mut flags, SelectionInput::SetSelected(false), true);
        assert_eq!(
            transition(&mut flags, SelectionInput::FocusLost, true),
            FocusDirective::Keep
        );
        assert!(!flags.selected);
    }

    #[test]
    fn reasserting_selected_reclaims_a_refused_grant() {
        let mut flags = SelectionFlags::default();
        transition(&mut flags, SelectionInput::SetSelected(true), false);
        // No FocusGranted arrived: the platform refused the claim.
        let directive = transition(&mut flags, SelectionInput::SetSelected(true), false);
        assert_eq!(directive, FocusDirective::Claim);
    }

    #[test]
    fn pop_runs_then_settles_when_still_selected() {
        let start = t0();
        let mut anim = SelectionAnimation::new();
        anim.begin(true, start);
        assert!(anim.advance(start + Duration::from_millis(50), true));
        assert!(anim.scale(start + Duration::from_millis(50), true) > 1.0);

        // Pop complete: settle starts because `selected` is still true.
        let at_pop_end = start + SELECT_POP_DURATION;
        assert!(anim.advance(at_pop_end, true));
        assert_eq!(anim.scale(at_pop_end, true), SELECT_POP_SCALE);

        let at_settle_end = at_pop_end + SELECT_SETTLE_DURATION;
        assert!(!anim.advance(at_settle_end, true));
        assert_eq!(anim.scale(at_settle_end, true), 1.0);
    }

    #[test]
    fn deselect_pop_swaps_colors_at_identity_scale() {
        let start = t0();
        let mut anim = SelectionAnimation::new();
        anim.begin(false, start);
        let mid = start + Duration::from_millis(100);
        assert!(anim.advance(mid, false));
        assert_eq!(anim.scale(mid, false), 1.0);
        assert!(anim.color_progress(mid) > 0.0);
        assert!(!anim.advance(start + SELECT_POP_DURATION, false));
    }

    #[test]
    fn rapid_toggle_ends_unselected_with_no_residual_scale() {
        let start = t0();
        let mut anim = SelectionAnimation::new();
        anim.begin(true, start);
        let first_epoch = anim.epoch();

        // Deselect before the pop completes: the newer transition replaces
        // the pending settle wholesale.
        let toggle = start + Duration::from_millis(50);
        anim.begin(false, toggle);
        assert_eq!(anim.epoch(), first_epoch + 1);
        assert_eq!(anim.scale(toggle, false), 1.0);

        let done = toggle + SELECT_POP_DURATION;
        assert!(!anim.advance(done, false));
        assert_eq!(anim.scale(done, false), 1.0);
        assert_eq!(anim.color_progress(done), 1.0);
    }

    #[test]
    fn stale_pop_never_settles_when_selection_was_lost() {
        let start = t0();
        let mut anim = SelectionAnimation::new();
        anim.begin(true, start);
        // Selection was revoked without a new timeline (caller error path):
        // the pop completion check still consults the latest value.
        let at_pop_end = start + SELECT_POP_DURATION;
        assert!(!anim.advance(at_pop_end, false));
        assert_eq!(anim.scale(at_pop_end, false), 1.0);
    }
}
