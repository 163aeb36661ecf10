//! Interactive tag (chip) components for the Tessera UI framework.
//!
//! # Usage
//!
//! This crate renders with the pipelines provided by `tessera-components`,
//! so register that package in your entry point.
//!
//! ```no_run
//! use tessera_components::theme::{MaterialTheme, material_theme};
//! use tessera_tags::tag_chip::{TagChipArgs, tag_chip};
//!
//! fn app() {
//!     material_theme(MaterialTheme::default, || {
//!         tag_chip(TagChipArgs::new("ruby").delimiter(","));
//!     });
//! }
//! ```
//!
//! # Intent callbacks
//!
//! A tag chip never acts on its own collection. It reports user intent
//! through three single-slot callbacks (delete requested, selection
//! requested, text inserted) and the containing controller decides the
//! consequence: remove the tag, deselect siblings, grow the text model.
//!
//! ```
//! # use tessera_ui::tessera;
//! # #[tessera]
//! # fn component() {
//! use tessera_tags::tag_chip::{TagChipArgs, tag_chip};
//!
//! tag_chip(
//!     TagChipArgs::new("rust")
//!         .delimiter(",")
//!         .on_delete_requested(|_replacement| { /* remove from the collection */ })
//!         .on_selection_requested(|| { /* make this the selected tag */ })
//!         .on_text_inserted(|typed| { let _ = typed; /* grow the text model */ }),
//! );
//! # }
//! ```
#![deny(missing_docs, clippy::unwrap_used)]

mod animation;
mod selection;

pub mod input_traits;
pub mod metrics;
pub mod tag;
pub mod tag_chip;

pub use tag::Tag;
pub use tag_chip::{TagChipArgs, TagChipColors, TagChipController, TagChipDefaults, tag_chip};
