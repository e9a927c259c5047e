//! Domain types: validated bars and the sliding bar window.

pub mod bar;
pub mod history;

pub use bar::{Bar, RawBar};
pub use history::BarHistory;
