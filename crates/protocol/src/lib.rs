pub mod color;
pub mod commands;
pub mod theme;
pub mod types;

pub use color::{HexColor, HexColorError};
pub use commands::{Paint, RenderCommand, TextAlign};
pub use theme::ThemeToken;
pub use types::{Point, Rect, Viewport};
