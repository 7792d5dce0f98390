//! Core types for char-indexed text editing: spans, ranges, selections and transactions.

/// Edit errors and transaction annotations.
pub mod edit;
/// Async future aliases.
pub mod future;
/// Selection range type (anchor/head).
pub mod range;
/// Rope line utilities.
pub mod rope;
/// Selection types for single and multi-cursor editing.
pub mod selection;
/// Half-open character spans.
pub mod span;
/// Change sets and transactions.
pub mod transaction;

pub use edit::{Annotation, EditError};
pub use future::BoxFutureLocal;
pub use range::{CharIdx, CharLen, Range};
pub use rope::{LineBounds, line_bounds};
pub use ropey::{Rope, RopeSlice};
pub use selection::Selection;
pub use span::Span;
pub use transaction::{Bias, Change, ChangeSet, ChangedRange, Transaction};
