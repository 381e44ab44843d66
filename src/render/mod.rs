pub mod surface;
pub mod texture;

pub use surface::{fit_rect, DisplaySurface, DrawRect, SurfaceProvider};
pub use texture::{blit_frame, fill_black};
