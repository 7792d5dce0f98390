//! Inline date chips for markdown-like documents.
//!
//! The engine scans the visible part of a document for small date tokens
//! (`📅 2024-01-15` or `[due:: 2024-01-15]`), exposes each one as a
//! [`DateChip`] decoration, and keeps those decorations aligned with the text
//! while the user types, scrolls and selects. Writing a new date back goes
//! through [`EditProtocol`], which re-locates the token in the live document
//! before issuing a single annotated replacement.
//!
//! The host editor is abstracted behind [`EditorHost`]; [`MarkdownView`] is
//! an in-memory implementation suitable for tests and simple embeddings.

pub mod config;
pub mod decoration;
pub mod document;
pub mod edit;
pub mod error;
pub mod extension;
pub mod format;
pub mod host;
pub mod manager;
pub mod matcher;
pub mod picker;
pub mod resolver;
pub mod suppression;
pub mod throttle;
pub mod widget;

#[cfg(test)]
mod testing;

pub use config::{ChipConfig, ConfigError};
pub use decoration::DecorationSet;
pub use document::MarkdownView;
pub use edit::{DATE_CHANGE, EditOutcome, EditProtocol};
pub use error::EngineError;
pub use extension::date_chip_extension;
pub use format::SurfaceFormat;
pub use host::{EditRequest, EditorHost, Line, SharedView, ViewHandle, ViewUpdate, ZoneTags};
pub use manager::{DecorationManager, Lifecycle, ManagerStats, RenderedChip, RescanReason};
pub use matcher::{PatternMatcher, TokenMatch};
pub use picker::{DatePicker, PickerOutcome, PickerRequest, pick_and_apply};
pub use resolver::RangeResolver;
pub use suppression::SuppressionFilter;
pub use throttle::{Throttle, ThrottleOutcome};
pub use widget::{ChipView, DateChip};
