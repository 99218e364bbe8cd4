mod canvas;
pub use canvas::{canvas_bounds, CanvasBounds};

mod perspective;
pub use perspective::warp_perspective;

mod quad;
pub use quad::{warp_full, warp_roi, warp_to_template, FullWarp};
