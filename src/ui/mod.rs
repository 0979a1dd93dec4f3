/// User interface
///
/// - `diff.rs` - minimal insert/remove scripts between selection snapshots
/// - `grid.rs` - tile grid of the selection, updated only through those scripts
/// - `canvas.rs` - zoomable image surface of the viewer
/// - `viewer.rs` - per-image detail screen

pub mod canvas;
pub mod diff;
pub mod grid;
pub mod viewer;
