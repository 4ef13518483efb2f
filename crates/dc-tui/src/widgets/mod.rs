//! Custom widgets

mod map;

pub use map::MapWidget;
