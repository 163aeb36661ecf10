use tessera_components::{
    flow_column::{FlowColumnArgs, flow_column},
    flow_row::{FlowRowArgs, flow_row},
    icon::IconArgs,
    material_icons,
    modifier::ModifierExt,
    surface::{SurfaceArgs, surface},
    text::{TextArgs, text},
    theme::{MaterialTheme, material_theme},
};
use tessera_tags::{
    Tag,
    tag_chip::{TagChipArgs, TagChipController, TagChipDefaults, tag_chip_with_controller},
};
use tessera_ui::{Dp, Modifier, State, remember, remember_with_key, tessera};

/// The demo owns the tag collection; chips only report intent.
#[derive(Clone, PartialEq)]
struct TagsDemoState {
    tags: Vec<Tag>,
    selected: Option<String>,
    typed: String,
}

impl TagsDemoState {
    fn new() -> Self {
        Self {
            tags: ["ruby", "rust", "swift", "kotlin"]
                .into_iter()
                .map(Tag::new)
                .collect(),
            selected: None,
            typed: String::new(),
        }
    }
}

#[tessera]
pub fn app() {
    material_theme(MaterialTheme::default, || {
        let background = surface_background();
        surface(&SurfaceArgs::with_child(background, || {
            tags_demo();
        }));
    });
}

fn surface_background() -> SurfaceArgs {
    SurfaceArgs::default().modifier(Modifier::new().fill_max_size().padding_all(Dp(24.0)))
}

#[tessera]
fn tags_demo() {
    let state = remember(TagsDemoState::new);
    let tags = state.with(|demo| demo.tags.clone());
    let selected = state.with(|demo| demo.selected.clone());
    let typed = state.with(|demo| demo.typed.clone());

    flow_column(
        FlowColumnArgs {
            item_spacing: Dp(16.0),
            ..Default::default()
        },
        |scope| {
            {
                let tags = tags.clone();
                let selected = selected.clone();
                scope.child(move || {
                    tag_row(state, tags.clone(), selected.clone());
                });
            }

            let status = match selected {
                Some(name) => format!("selected: {name}"),
                None => "no selection".to_string(),
            };
            scope.child(move || {
                text(&TextArgs::default().text(status.clone()));
            });

            if !typed.is_empty() {
                let typed_line = format!("typed: {typed}");
                scope.child(move || {
                    text(&TextArgs::default().text(typed_line.clone()));
                });
            }
        },
    );
}

#[tessera]
fn tag_row(state: State<TagsDemoState>, tags: Vec<Tag>, selected: Option<String>) {
    flow_row(
        FlowRowArgs {
            item_spacing: Dp(8.0),
            line_spacing: Dp(8.0),
            ..Default::default()
        },
        |scope| {
            for tag in tags {
                let is_selected = selected.as_deref() == Some(tag.text());
                scope.child(move || {
                    demo_chip(state, tag.clone(), is_selected);
                });
            }
        },
    );
}

#[tessera]
fn demo_chip(state: State<TagsDemoState>, tag: Tag, is_selected: bool) {
    let controller = remember_with_key(tag.text().to_string(), TagChipController::new);
    // The demo is the external controller: it owns exclusive selection and
    // pushes the outcome back into each chip.
    controller.with_mut(|chip| chip.set_selected(is_selected));

    let mut close = IconArgs::from(material_icons::filled::close_icon());
    close.size = TagChipDefaults::ICON_SIZE;

    let name = tag.text().to_string();
    let args = TagChipArgs::new(tag)
        .delimiter(",")
        .close_icon(close)
        .on_selection_requested({
            let name = name.clone();
            move || {
                let name = name.clone();
                state.with_mut(|demo| demo.selected = Some(name));
            }
        })
        .on_delete_requested({
            let name = name.clone();
            move |_replacement| {
                let name = name.clone();
                state.with_mut(|demo| {
                    demo.tags.retain(|tag| tag.text() != name);
                    if demo.selected.as_deref() == Some(&name) {
                        demo.selected = None;
                    }
                });
            }
        })
        .on_text_inserted(move |typed| {
            state.with_mut(|demo| demo.typed.push_str(&typed));
        });

    tag_chip_with_controller(args, controller);
}
