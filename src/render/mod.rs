//! Pure widget arithmetic: value(s) plus a width in, text-shaped data
//! out. No I/O and no randomness, so every function here re-renders
//! deterministically and tests without a terminal.

pub mod bar;
pub mod layout;
pub mod spark;

pub use bar::{Band, Bar, render_bar};
pub use layout::{LayoutPlan, ProcessColumn, choose_layout};
pub use spark::{Sparkline, render_spark};
