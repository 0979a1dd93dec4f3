/// Zoom and pan interaction for the detail viewer
///
/// - `gesture.rs` - classifies raw pointer input into pan/pinch events
/// - `transform.rs` - zoom/pan state machine and the view matrix
///
/// Neither module knows about iced; the canvas in `ui::canvas` adapts widget
/// events into [`PointerInput`] and draws with the resulting [`Affine`].

pub mod gesture;
pub mod transform;

pub use gesture::{GestureRouter, PointerInput};
pub use transform::{Affine, DisplayMode, TransformController};
