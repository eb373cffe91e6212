//! Export of calculation history.

mod history;

pub use history::*;
