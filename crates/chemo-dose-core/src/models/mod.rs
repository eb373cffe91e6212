//! Domain models for the dose calculator.

mod history;
mod patient;
mod regimen;
mod result;

pub use history::*;
pub use patient::*;
pub use regimen::*;
pub use result::*;
