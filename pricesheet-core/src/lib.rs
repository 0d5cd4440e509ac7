//! Core engine for the weekly price-sheet generator.
//!
//! Takes operator-entered price records, groups them by item, lays
//! the groups out across two height-balanced columns and renders the
//! result as an image. Two pieces do the real work:
//!
//! - [`price::parse`] turns a free-text price field ("$1,200",
//!   "850元", "3.5-4kg 12000", "售完") into a comparable amount;
//! - [`render::build_sheet_svg`] + [`render::rasterize`] turn grouped
//!   records into a fixed-width sheet with content-derived height.
//!
//! Rendering is synchronous and deterministic: a fresh canvas and
//! fresh column cursors per call, no global state, same inputs and
//! fonts giving pixel-identical output. Fonts, spreadsheet access and
//! file I/O stay outside this crate; the font database is injected by
//! the caller and an empty one is valid (degraded but structurally
//! correct output).

pub mod error;
pub mod layout;
pub mod price;
pub mod record;
pub mod render;
pub mod theme;

pub use error::{Result, SheetError};
pub use layout::{Column, GroupSlot, SheetLayout, measure};
pub use record::{ItemGroup, PriceRecord, group_records, retain_priced};
pub use render::{SheetSvg, build_sheet_svg, encode_png, rasterize, render};
pub use theme::Theme;
