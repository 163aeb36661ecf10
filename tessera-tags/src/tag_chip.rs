//! An interactive tag chip: a compact token that displays a text label with
//! an optional trailing delimiter, can be selected, can request its own
//! deletion, and accepts raw character input while focused.
//!
//! ## Usage
//!
//! Construct [`TagChipArgs`] from a [`Tag`] value, register the three intent
//! callbacks, and let the containing controller decide what each intent
//! means. The chip never removes itself and never edits its own label: a
//! close tap or a backward delete only emits `on_delete_requested`, typed
//! characters only emit `on_text_inserted`.
use std::time::Instant;

use derive_setters::Setters;
use tessera_ui::{
    Callback, CallbackWith, Color, ComputedData, Constraint, CursorEventContent, DimensionValue,
    Dp, Focus, ImeRequest, LayoutInput, LayoutOutput, LayoutSpec, MeasurementError, Modifier, Px,
    PxPosition, PxSize, State,
    accesskit::Role,
    receive_frame_nanos, remember, tessera, use_context, winit,
};

use tessera_components::{
    icon::{IconArgs, icon},
    modifier::Padding,
    pos_misc::is_position_in_component,
    shape_def::Shape,
    surface::{SurfaceArgs, SurfaceStyle, surface},
    text::{TextArgs, text},
    theme::{MaterialTheme, provide_text_style},
};

use crate::{
    input_traits::InputTraits,
    metrics::{self, ChipMargins},
    selection::{FocusDirective, SelectionAnimation, SelectionFlags, SelectionInput, transition},
    tag::Tag,
};

/// Default values for tag chips.
pub struct TagChipDefaults;

impl TagChipDefaults {
    /// Default corner radius of the chip container.
    pub const CORNER_RADIUS: Dp = Dp(3.0);
    /// Default layout margin applied on every edge.
    pub const MARGIN: Dp = Dp(8.0);
    /// Fixed inset a trailing accessory keeps from the label's trailing
    /// edge.
    pub const TRAILING_INSET: Dp = Dp(15.0);
    /// Default icon size for leading and close accessories.
    pub const ICON_SIZE: Dp = Dp(18.0);

    /// Default layout margins on all four edges.
    pub fn margins() -> Padding {
        Padding::all(Self::MARGIN)
    }

    /// Default color pairs, derived from the current [`MaterialTheme`].
    pub fn colors() -> TagChipColors {
        let scheme = use_context::<MaterialTheme>()
            .expect("MaterialTheme must be provided")
            .get()
            .color_scheme;
        TagChipColors {
            background: scheme.primary,
            text: scheme.on_primary,
            selected_background: scheme.secondary_container,
            selected_text: scheme.on_secondary_container,
        }
    }

    /// The input preferences a chip publishes while focused.
    pub fn input_traits() -> InputTraits {
        InputTraits::default()
    }
}

/// The background/text color pairs a chip swaps between.
///
/// Exactly one pair is active at any time: the selected pair while the chip
/// is selected, the default pair otherwise. During an animated transition
/// the paint interpolates from the previous pair toward the pair resolved
/// by the current `selected` value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TagChipColors {
    /// Container color while unselected.
    pub background: Color,
    /// Label color while unselected.
    pub text: Color,
    /// Container color while selected.
    pub selected_background: Color,
    /// Label color while selected.
    pub selected_text: Color,
}

impl TagChipColors {
    fn background_for(&self, selected: bool) -> Color {
        if selected {
            self.selected_background
        } else {
            self.background
        }
    }

    fn text_for(&self, selected: bool) -> Color {
        if selected {
            self.selected_text
        } else {
            self.text
        }
    }
}

fn lerp_color(from: Color, to: Color, progress: f32) -> Color {
    let t = progress.clamp(0.0, 1.0);
    Color {
        r: from.r + (to.r - from.r) * t,
        g: from.g + (to.g - from.g) * t,
        b: from.b + (to.b - from.b) * t,
        a: from.a + (to.a - from.a) * t,
    }
}

/// Retained state of a tag chip: the selection/focus machine, the focus
/// handle, and the transition animation.
///
/// Selection and focus are only ever mutated through the machine's single
/// transition function, so the single-selection sync rule lives in one
/// place no matter which side initiated a change.
pub struct TagChipController {
    flags: SelectionFlags,
    multi_selection: bool,
    focus: Focus,
    anim: SelectionAnimation,
    close_rect: Option<(PxPosition, PxSize)>,
}

impl Default for TagChipController {
    fn default() -> Self {
        Self::new()
    }
}

impl TagChipController {
    /// Creates an unselected controller.
    pub fn new() -> Self {
        Self {
            flags: SelectionFlags::default(),
            multi_selection: false,
            focus: Focus::new(),
            anim: SelectionAnimation::new(),
            close_rect: None,
        }
    }

    /// Creates a controller with an initial selection state and mode.
    pub fn with_initial(selected: bool, multi_selection: bool) -> Self {
        let mut controller = Self::new();
        controller.multi_selection = multi_selection;
        if selected {
            controller.set_selected(true);
        }
        controller
    }

    /// Whether the chip currently displays as selected.
    pub fn is_selected(&self) -> bool {
        self.flags.selected
    }

    /// Whether the chip currently holds input focus.
    pub fn is_focused(&self) -> bool {
        self.focus.is_focused()
    }

    /// Externally assigns the `selected` flag.
    ///
    /// In single-selection mode this claims or releases focus to keep the
    /// two facets equal. Re-assigning the current value is a no-op unless a
    /// focus claim is still outstanding, which bounds re-entrant loops when
    /// a callback immediately re-triggers the same transition.
    pub fn set_selected(&mut self, selected: bool) {
        if selected == self.flags.selected
            && (self.multi_selection || self.flags.focused == selected)
        {
            return;
        }
        self.apply(SelectionInput::SetSelected(selected));
    }

    /// Toggles the `selected` flag.
    pub fn toggle_selected(&mut self) {
        let selected = self.flags.selected;
        self.set_selected(!selected);
    }

    /// Claims input focus for this chip.
    ///
    /// In single-selection mode a granted claim also sets `selected`.
    pub fn request_focus(&mut self) {
        self.focus.request_focus();
        if self.focus.is_focused() {
            self.apply(SelectionInput::FocusGranted);
        }
    }

    /// Releases input focus held by this chip.
    ///
    /// In single-selection mode this also clears `selected`.
    pub fn release_focus(&mut self) {
        self.focus.unfocus();
        self.apply(SelectionInput::FocusLost);
    }

    pub(crate) fn set_multi_selection(&mut self, multi_selection: bool) {
        self.multi_selection = multi_selection;
    }

    /// Reconciles the machine against the platform's actual focus grant.
    ///
    /// Either side can drive the other: a grant that arrived from outside
    /// forces `selected = true`, a revocation forces `selected = false`,
    /// and a claim the platform silently refused rolls the display flag
    /// back so it never disagrees with real focus for more than a frame.
    pub(crate) fn sync_focus(&mut self) {
        let granted = self.focus.is_focused();
        if granted != self.flags.focused {
            self.apply(if granted {
                SelectionInput::FocusGranted
            } else {
                SelectionInput::FocusLost
            });
        } else if !self.multi_selection && self.flags.selected != granted {
            self.apply(SelectionInput::SetSelected(granted));
        }
    }

    fn apply(&mut self, input: SelectionInput) {
        let was_selected = self.flags.selected;
        let directive = transition(&mut self.flags, input, self.multi_selection);
        match directive {
            FocusDirective::Claim => {
                self.focus.request_focus();
                if self.focus.is_focused() {
                    transition(
                        &mut self.flags,
                        SelectionInput::FocusGranted,
                        self.multi_selection,
                    );
                }
            }
            FocusDirective::Release => {
                self.focus.unfocus();
                transition(
                    &mut self.flags,
                    SelectionInput::FocusLost,
                    self.multi_selection,
                );
            }
            FocusDirective::Keep => {}
        }
        if self.flags.selected != was_selected {
            tracing::trace!(selected = self.flags.selected, "tag chip selection changed");
            self.anim.begin(self.flags.selected, Instant::now());
        }
    }

    pub(crate) fn advance_animation(&mut self, now: Instant) -> bool {
        self.anim.advance(now, self.flags.selected)
    }

    pub(crate) fn resolved_colors(&self, colors: &TagChipColors, now: Instant) -> (Color, Color) {
        let selected = self.flags.selected;
        let progress = self.anim.color_progress(now);
        if progress >= 1.0 {
            return (
                colors.background_for(selected),
                colors.text_for(selected),
            );
        }
        (
            lerp_color(
                colors.background_for(!selected),
                colors.background_for(selected),
                progress,
            ),
            lerp_color(
                colors.text_for(!selected),
                colors.text_for(selected),
                progress,
            ),
        )
    }

    pub(crate) fn current_scale(&self, now: Instant) -> f32 {
        self.anim.scale(now, self.flags.selected)
    }

    pub(crate) fn record_close_rect(&mut self, rect: Option<(PxPosition, PxSize)>) {
        self.close_rect = rect;
    }

    pub(crate) fn close_rect(&self) -> Option<(PxPosition, PxSize)> {
        self.close_rect
    }
}

/// Arguments for the [`tag_chip`] component.
///
/// There is deliberately no `Default`: a chip has no meaningful state
/// without a [`Tag`], so every construction path goes through
/// [`TagChipArgs::new`].
#[derive(Clone, Setters)]
pub struct TagChipArgs {
    /// The tag value this chip displays. Copied at construction.
    #[setters(skip)]
    pub tag: Tag,
    /// Suffix appended after the tag text (for example a separator shown
    /// while unselected). May be empty, never absent.
    #[setters(into)]
    pub delimiter: String,
    /// Font size override for the label. Defaults to the theme's large
    /// label style.
    #[setters(strip_option)]
    pub font_size: Option<Dp>,
    /// Line height override for the label.
    #[setters(strip_option)]
    pub line_height: Option<Dp>,
    /// Corner radius of the chip container.
    pub corner_radius: Dp,
    /// Border width of the chip container. Zero renders no border.
    pub border_width: Dp,
    /// Border color. Defaults to the theme outline color.
    #[setters(strip_option)]
    pub border_color: Option<Color>,
    /// Color pairs override. Defaults to [`TagChipDefaults::colors`].
    #[setters(strip_option)]
    pub colors: Option<TagChipColors>,
    /// Optional leading icon.
    #[setters(strip_option)]
    pub leading_icon: Option<IconArgs>,
    /// Optional close affordance icon. Tapping it emits
    /// `on_delete_requested`.
    #[setters(strip_option)]
    pub close_icon: Option<IconArgs>,
    /// Initial selection state for a chip-owned controller.
    pub selected: bool,
    /// When true, `selected` is a pure display flag with no focus
    /// interaction.
    pub allows_multiple_selection: bool,
    /// Advisory flag for external controllers; the chip itself does not
    /// enforce it.
    pub removable: bool,
    /// Layout margins around the label.
    pub margins: Padding,
    /// Keyboard preferences published for the host input system.
    pub input_traits: InputTraits,
    /// Optional modifier chain applied to the chip subtree.
    pub modifier: Modifier,
    /// Optional accessibility label. Defaults to the rendered label text.
    #[setters(strip_option, into)]
    pub accessibility_label: Option<String>,
    /// Optional accessibility description.
    #[setters(strip_option, into)]
    pub accessibility_description: Option<String>,
    /// Called when the chip requests its own deletion: a close tap or a
    /// backward delete while focused. The argument carries replacement
    /// text when the deletion stems from typing over the chip; both
    /// built-in paths pass `None`. A delete intent is emitted even when
    /// the label is empty.
    #[setters(skip)]
    pub on_delete_requested: CallbackWith<Option<String>, ()>,
    /// Called when the chip is tapped, unless it is already selected in
    /// single-selection mode.
    #[setters(skip)]
    pub on_selection_requested: Callback,
    /// Called with raw text typed or committed while the chip is focused.
    /// The chip never appends the text to its own label.
    #[setters(skip)]
    pub on_text_inserted: CallbackWith<String, ()>,
    /// Optional external controller for selection, focus, and animation
    /// state.
    #[setters(skip)]
    pub controller: Option<State<TagChipController>>,
}

impl TagChipArgs {
    /// Creates chip arguments for the given tag value.
    pub fn new(tag: impl Into<Tag>) -> Self {
        Self {
            tag: tag.into(),
            delimiter: String::new(),
            font_size: None,
            line_height: None,
            corner_radius: TagChipDefaults::CORNER_RADIUS,
            border_width: Dp(0.0),
            border_color: None,
            colors: None,
            leading_icon: None,
            close_icon: None,
            selected: false,
            allows_multiple_selection: false,
            removable: true,
            margins: TagChipDefaults::margins(),
            input_traits: TagChipDefaults::input_traits(),
            modifier: Modifier::new(),
            accessibility_label: None,
            accessibility_description: None,
            on_delete_requested: CallbackWith::new(|_| {}),
            on_selection_requested: Callback::new(|| {}),
            on_text_inserted: CallbackWith::new(|_| {}),
            controller: None,
        }
    }

    /// The text the label renders: tag text plus delimiter.
    pub fn rendered_label(&self) -> String {
        metrics::rendered_label(self.tag.text(), &self.delimiter)
    }

    /// Sets the delete-intent handler.
    pub fn on_delete_requested<F>(mut self, on_delete_requested: F) -> Self
    where
        F: Fn(Option<String>) + Send + Sync + 'static,
    {
        self.on_delete_requested = CallbackWith::new(on_delete_requested);
        self
    }

    /// Sets the delete-intent handler using a shared callback.
    pub fn on_delete_requested_shared(
        mut self,
        on_delete_requested: impl Into<CallbackWith<Option<String>, ()>>,
    ) -> Self {
        self.on_delete_requested = on_delete_requested.into();
        self
    }

    /// Sets the selection-intent handler.
    pub fn on_selection_requested<F>(mut self, on_selection_requested: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_selection_requested = Callback::new(on_selection_requested);
        self
    }

    /// Sets the selection-intent handler using a shared callback.
    pub fn on_selection_requested_shared(
        mut self,
        on_selection_requested: impl Into<Callback>,
    ) -> Self {
        self.on_selection_requested = on_selection_requested.into();
        self
    }

    /// Sets the text-insertion handler.
    pub fn on_text_inserted<F>(mut self, on_text_inserted: F) -> Self
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.on_text_inserted = CallbackWith::new(on_text_inserted);
        self
    }

    /// Sets the text-insertion handler using a shared callback.
    pub fn on_text_inserted_shared(
        mut self,
        on_text_inserted: impl Into<CallbackWith<String, ()>>,
    ) -> Self {
        self.on_text_inserted = on_text_inserted.into();
        self
    }

    /// Sets an external controller for controlled chip state.
    pub fn controller(mut self, controller: State<TagChipController>) -> Self {
        self.controller = Some(controller);
        self
    }
}

#[derive(Clone)]
struct TagChipLayout {
    margins: Padding,
    has_leading: bool,
    has_close: bool,
    scale: f32,
    controller: State<TagChipController>,
}

impl PartialEq for TagChipLayout {
    fn eq(&self, other: &Self) -> bool {
        self.margins == other.margins
            && self.has_leading == other.has_leading
            && self.has_close == other.has_close
            && self.scale == other.scale
    }
}

impl LayoutSpec for TagChipLayout {
    fn measure(
        &self,
        input: &LayoutInput<'_>,
        output: &mut LayoutOutput<'_>,
    ) -> Result<ComputedData, MeasurementError> {
        let margins = ChipMargins::from_padding(&self.margins);
        let trailing_inset: Px = TagChipDefaults::TRAILING_INSET.into();
        let children = input.children_ids();
        // Declaration order in `tag_chip_content`: label, leading icon,
        // close icon.
        let label_id = children[0];
        let leading_id = self.has_leading.then(|| children[1]);
        let close_id = self
            .has_close
            .then(|| children[if self.has_leading { 2 } else { 1 }]);

        // The label is measured unconstrained: the chip derives its size
        // from the label, then clamps to the available width.
        let loose = Constraint::new(
            DimensionValue::Wrap {
                min: None,
                max: None,
            },
            DimensionValue::Wrap {
                min: None,
                max: None,
            },
        );
        let sizes = input.measure_children(
            children
                .iter()
                .copied()
                .map(|node_id| (node_id, loose))
                .collect(),
        )?;
        let size_of = |node_id| {
            sizes
                .get(&node_id)
                .copied()
                .map(|data| PxSize::new(data.width, data.height))
                .unwrap_or(PxSize::new(Px::ZERO, Px::ZERO))
        };

        let label_size = size_of(label_id);
        let leading_size = leading_id.map(size_of);
        let close_size = close_id.map(size_of);

        let intrinsic = metrics::intrinsic_size(label_size, leading_size, close_size, &margins);
        let available = match input.parent_constraint().width() {
            DimensionValue::Fixed(width) => Some(width),
            DimensionValue::Wrap { max, .. } => max,
            DimensionValue::Fill { max, .. } => max,
        };
        let fitted = available.map_or(intrinsic, |width| metrics::fit_within(intrinsic, width));

        // The selection pop inflates the box symmetrically; content keeps
        // its position relative to the unscaled bounds.
        let scaled = PxSize::new(
            Px::saturating_from_f32(fitted.width.0 as f32 * self.scale),
            Px::saturating_from_f32(fitted.height.0 as f32 * self.scale),
        );
        let shift = PxPosition::new(
            Px((scaled.width.0 - fitted.width.0) / 2),
            Px((scaled.height.0 - fitted.height.0) / 2),
        );

        let label_origin = metrics::label_origin(&margins);
        output.place_child(
            label_id,
            PxPosition::new(label_origin.x + shift.x, label_origin.y + shift.y),
        );

        let accessory_origin = metrics::trailing_accessory_origin(
            label_origin,
            label_size.width,
            &margins,
            trailing_inset,
        );
        let placed_accessory =
            PxPosition::new(accessory_origin.x + shift.x, accessory_origin.y + shift.y);
        if let Some(node_id) = leading_id {
            output.place_child(node_id, placed_accessory);
        }
        if let Some(node_id) = close_id {
            output.place_child(node_id, placed_accessory);
        }

        // Remember where the close affordance actually landed so pointer
        // hit-testing never has to infer placement from coordinates.
        let close_rect = close_size.map(|size| (placed_accessory, size));
        self.controller
            .with_mut(|controller| controller.record_close_rect(close_rect));

        Ok(ComputedData {
            width: scaled.width,
            height: scaled.height,
        })
    }
}

#[derive(Clone)]
struct TagChipContentArgs {
    label: String,
    text_color: Color,
    leading_icon: Option<IconArgs>,
    close_icon: Option<IconArgs>,
    margins: Padding,
    scale: f32,
}

#[tessera]
fn tag_chip_content(args: TagChipContentArgs, controller: State<TagChipController>) {
    let has_leading = args.leading_icon.is_some();
    let has_close = args.close_icon.is_some();

    // Child order is what TagChipLayout::measure relies on.
    let label = args.label;
    text(&TextArgs::default().text(label));

    if let Some(mut leading) = args.leading_icon {
        leading.tint = args.text_color;
        icon(&leading);
    }
    if let Some(mut close) = args.close_icon {
        close.tint = args.text_color;
        icon(&close);
    }

    layout(TagChipLayout {
        margins: args.margins,
        has_leading,
        has_close,
        scale: args.scale,
        controller,
    });
}

/// # tag_chip
///
/// Renders an interactive tag token with an optional leading icon and an
/// optional close affordance.
///
/// ## Usage
///
/// Present one entry of a tag collection. The chip reports user intent
/// through its three callbacks and leaves every consequence (removal,
/// exclusive selection, text-model edits) to the containing controller.
///
/// ## Parameters
///
/// - `args` — configures the chip's tag value, appearance, and intent
///   callbacks; see [`TagChipArgs`].
///
/// ## Examples
///
/// ```
/// use tessera_tags::tag_chip::{TagChipArgs, tag_chip};
/// use tessera_ui::tessera;
///
/// #[tessera]
/// fn tag_row() {
///     tag_chip(
///         TagChipArgs::new("ruby")
///             .delimiter(",")
///             .on_selection_requested(|| { /* select this chip */ })
///             .on_delete_requested(|_replacement| { /* remove this chip */ }),
///     );
/// }
/// ```
#[tessera]
pub fn tag_chip(args: impl Into<TagChipArgs>) {
    let args: TagChipArgs = args.into();
    let initial_selected = args.selected;
    let multi_selection = args.allows_multiple_selection;
    let controller = args.controller.unwrap_or_else(|| {
        remember(|| TagChipController::with_initial(initial_selected, multi_selection))
    });
    let mut args = args;
    args.controller = Some(controller);
    tag_chip_with_controller(args, controller);
}

/// # tag_chip_with_controller
///
/// Renders a tag chip driven by an external [`TagChipController`].
///
/// ## Usage
///
/// Use when the containing controller needs to mutate selection or focus
/// programmatically, for example to deselect siblings after a selection
/// intent, or to select the trailing chip when the user backspaces out of
/// an adjacent text field.
///
/// ## Parameters
///
/// - `args` — configures the chip; see [`TagChipArgs`].
/// - `controller` — retained selection/focus/animation state.
///
/// ## Examples
///
/// ```
/// use tessera_tags::tag_chip::{TagChipArgs, TagChipController, tag_chip_with_controller};
/// use tessera_ui::{remember, tessera};
///
/// #[tessera]
/// fn controlled_chip() {
///     let controller = remember(TagChipController::new);
///     controller.with_mut(|chip| chip.set_selected(true));
///     tag_chip_with_controller(TagChipArgs::new("swift"), controller);
/// }
/// ```
#[tessera]
pub fn tag_chip_with_controller(
    args: impl Into<TagChipArgs>,
    controller: State<TagChipController>,
) {
    let args: TagChipArgs = args.into();
    let theme = use_context::<MaterialTheme>()
        .expect("MaterialTheme must be provided")
        .get();

    controller.with_mut(|chip| {
        chip.set_multi_selection(args.allows_multiple_selection);
        // Focus and selection reconcile before painting, so either side
        // can have driven the other since the previous frame.
        chip.sync_focus();
    });

    let now = Instant::now();
    if controller.with_mut(|chip| chip.advance_animation(now)) {
        let controller_for_frame = controller;
        receive_frame_nanos(move |_| {
            let live = controller_for_frame
                .with_mut(|chip| chip.advance_animation(Instant::now()));
            if live {
                tessera_ui::FrameNanosControl::Continue
            } else {
                tessera_ui::FrameNanosControl::Stop
            }
        });
    }

    let colors = args.colors.unwrap_or_else(TagChipDefaults::colors);
    let (background_color, text_color) =
        controller.with(|chip| chip.resolved_colors(&colors, now));
    let scale = controller.with(|chip| chip.current_scale(now));

    let mut text_style = theme.typography.label_large;
    if let Some(font_size) = args.font_size {
        text_style.font_size = font_size;
    }
    if let Some(line_height) = args.line_height {
        text_style.line_height = Some(line_height);
    }

    let style = if args.border_width.0 > 0.0 {
        SurfaceStyle::FilledOutlined {
            fill_color: background_color,
            border_color: args
                .border_color
                .unwrap_or(theme.color_scheme.outline_variant),
            border_width: args.border_width,
        }
    } else {
        SurfaceStyle::Filled {
            color: background_color,
        }
    };

    let content_args = TagChipContentArgs {
        label: args.rendered_label(),
        text_color,
        leading_icon: args.leading_icon.clone(),
        close_icon: args.close_icon.clone(),
        margins: args.margins,
        scale,
    };
    let surface_args = SurfaceArgs::default()
        .modifier(args.modifier.clone())
        .style(style)
        .shape(Shape::rounded_rectangle(args.corner_radius))
        .content_color(text_color);
    surface(&SurfaceArgs::with_child(surface_args, {
        let text_style = text_style;
        move || {
            let content_args = content_args.clone();
            provide_text_style(text_style, move || {
                tag_chip_content(content_args, controller);
            });
        }
    }));

    let handler_args = args;
    input_handler(move |mut input| {
        handle_tag_chip_input(&mut input, &handler_args, &controller);
    });
}

fn handle_tag_chip_input(
    input: &mut tessera_ui::InputHandlerInput<'_>,
    args: &TagChipArgs,
    controller: &State<TagChipController>,
) {
    let size = input.computed_data;
    let cursor_pos_option = input.cursor_position_rel;
    let is_cursor_in_chip = cursor_pos_option
        .map(|pos| is_position_in_component(size, pos))
        .unwrap_or(false);

    if is_cursor_in_chip {
        input.requests.cursor_icon = winit::window::CursorIcon::Pointer;
    }

    let pressed = input
        .cursor_events
        .iter()
        .any(|event| matches!(event.content, CursorEventContent::Pressed(_)));
    if is_cursor_in_chip && pressed {
        let close_rect = controller.with(|chip| chip.close_rect());
        let pressed_close = args.close_icon.is_some()
            && cursor_pos_option
                .zip(close_rect)
                .map(|(pos, (origin, rect_size))| metrics::rect_contains(origin, rect_size, pos))
                .unwrap_or(false);

        if pressed_close {
            tracing::trace!("tag chip close affordance pressed");
            args.on_delete_requested.call(None);
        } else if !controller.with(|chip| chip.is_selected()) || args.allows_multiple_selection {
            // A tap on an already-selected chip in single-selection mode
            // is a no-op: re-requesting selection would only churn focus.
            args.on_selection_requested.call();
        }
        input.cursor_events.clear();
    }

    if controller.with(|chip| chip.is_focused()) {
        for key_event in input.keyboard_events.iter() {
            if key_event.state != winit::event::ElementState::Pressed {
                continue;
            }
            match &key_event.logical_key {
                winit::keyboard::Key::Named(winit::keyboard::NamedKey::Backspace) => {
                    // The chip always reports "has text": a backward delete
                    // is deliverable no matter what the label holds.
                    args.on_delete_requested.call(None);
                }
                winit::keyboard::Key::Named(winit::keyboard::NamedKey::Space) => {
                    args.on_text_inserted.call(" ".to_string());
                }
                winit::keyboard::Key::Character(character) => {
                    args.on_text_inserted.call(character.to_string());
                }
                _ => {}
            }
        }
        input.keyboard_events.clear();

        let ime_events: Vec<_> = input.ime_events.drain(..).collect();
        for event in ime_events {
            if let winit::event::Ime::Commit(committed) = event {
                args.on_text_inserted.call(committed);
            }
        }

        input.requests.ime_request = Some(ImeRequest::new(size.into()));
    }

    apply_tag_chip_accessibility(input, args, controller);
}

fn apply_tag_chip_accessibility(
    input: &mut tessera_ui::InputHandlerInput<'_>,
    args: &TagChipArgs,
    controller: &State<TagChipController>,
) {
    let mut builder = input.accessibility().role(Role::Button);

    let label = args
        .accessibility_label
        .clone()
        .unwrap_or_else(|| args.rendered_label());
    if !label.is_empty() {
        builder = builder.label(label);
    }
    let description = args
        .accessibility_description
        .clone()
        .or_else(|| controller.with(|chip| chip.is_selected()).then(|| "selected".to_string()));
    if let Some(description) = description {
        builder = builder.description(description);
    }
    builder = builder.focusable();
    builder.commit();
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::selection::{SELECT_POP_DURATION, SELECT_SETTLE_DURATION};

    fn palette() -> TagChipColors {
        TagChipColors {
            background: Color::new(0.1, 0.2, 0.3, 1.0),
            text: Color::WHITE,
            selected_background: Color::new(0.8, 0.8, 0.8, 1.0),
            selected_text: Color::BLACK,
        }
    }

    #[test]
    fn rendered_label_includes_delimiter() {
        let args = TagChipArgs::new("ruby").delimiter(",");
        assert_eq!(args.rendered_label(), "ruby,");
        let bare = TagChipArgs::new("ruby");
        assert_eq!(bare.rendered_label(), "ruby");
    }

    #[test]
    fn multi_selection_toggle_never_touches_focus() {
        let mut chip = TagChipController::with_initial(false, true);
        chip.set_selected(true);
        assert!(chip.is_selected());
        assert!(!chip.is_focused());
        chip.set_selected(false);
        assert!(!chip.is_selected());
        assert!(!chip.is_focused());
    }

    // The one test that exercises the real (global) focus registry; keeping
    // it alone avoids cross-test interference on the shared state.
    #[test]
    fn single_selection_drives_and_follows_real_focus() {
        let mut chip = TagChipController::new();
        chip.set_selected(true);
        assert!(chip.is_selected());
        assert!(chip.is_focused());

        chip.set_selected(false);
        assert!(!chip.is_selected());
        assert!(!chip.is_focused());

        // The platform side can drive selection as well.
        chip.request_focus();
        assert!(chip.is_selected());
        chip.release_focus();
        assert!(!chip.is_selected());
    }

    #[test]
    fn rapid_toggle_settles_on_the_unselected_pair_at_identity_scale() {
        let mut chip = TagChipController::with_initial(false, true);
        chip.set_selected(true);
        chip.set_selected(false);

        let later = Instant::now() + SELECT_POP_DURATION + SELECT_SETTLE_DURATION;
        let animating = chip.advance_animation(later);
        assert!(!animating);

        let colors = palette();
        let (background, text) = chip.resolved_colors(&colors, later);
        assert_eq!(background, colors.background);
        assert_eq!(text, colors.text);
        assert_eq!(chip.current_scale(later), 1.0);
    }

    #[test]
    fn selection_transition_interpolates_toward_the_selected_pair() {
        let mut chip = TagChipController::with_initial(false, true);
        chip.set_selected(true);

        let mid = Instant::now() + Duration::from_millis(60);
        let colors = palette();
        let (background, _) = chip.resolved_colors(&colors, mid);
        assert_ne!(background, colors.background);
        assert_ne!(background, colors.selected_background);

        let done = Instant::now() + SELECT_POP_DURATION + SELECT_SETTLE_DURATION;
        chip.advance_animation(done);
        let (background, text) = chip.resolved_colors(&colors, done);
        assert_eq!(background, colors.selected_background);
        assert_eq!(text, colors.selected_text);
    }

    #[test]
    fn reassigning_the_same_selected_value_does_not_restart_the_animation() {
        let mut chip = TagChipController::with_initial(false, true);
        chip.set_selected(true);
        let at_pop_end = Instant::now() + SELECT_POP_DURATION;
        chip.advance_animation(at_pop_end);
        let settled = at_pop_end + SELECT_SETTLE_DURATION;
        assert!(!chip.advance_animation(settled));

        chip.set_selected(true);
        assert!(!chip.advance_animation(settled));
        assert_eq!(chip.current_scale(settled), 1.0);
    }

    #[test]
    fn close_rect_bookkeeping_round_trips() {
        let mut chip = TagChipController::new();
        assert_eq!(chip.close_rect(), None);
        let rect = (
            PxPosition::new(Px(33), Px(8)),
            PxSize::new(Px(18), Px(18)),
        );
        chip.record_close_rect(Some(rect));
        assert_eq!(chip.close_rect(), Some(rect));
        chip.record_close_rect(None);
        assert_eq!(chip.close_rect(), None);
    }
}
