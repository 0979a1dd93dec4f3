/// State management module
///
/// This module holds the session state that is independent of any widget:
/// - Shared data structures (data.rs)
/// - The ordered, de-duplicated image selection (selection.rs)

pub mod data;
pub mod selection;

pub use data::{ImageInfo, ImageRef};
pub use selection::SelectionStore;
