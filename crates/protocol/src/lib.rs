pub mod classes;
pub mod commands;
pub mod fragment;
pub mod types;

pub use classes::ClassToken;
pub use commands::DomCommand;
pub use fragment::Fragment;
pub use types::{ElementId, Rect, Viewport};
