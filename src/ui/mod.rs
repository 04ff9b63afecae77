pub mod pane;
pub mod render;

pub use pane::{Pane, Panes};
pub use render::{present, render_processing, render_result, render_subject};
