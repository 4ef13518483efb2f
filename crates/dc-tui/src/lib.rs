//! dc-tui: Terminal layer using ratatui
//!
//! Draws rendered maze maps and hosts the `dcrawl` command-line front end.

pub mod theme;
pub mod view;
pub mod widgets;

pub use theme::{Background, Theme};
pub use view::show_map;
pub use widgets::MapWidget;
