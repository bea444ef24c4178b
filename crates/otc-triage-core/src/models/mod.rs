//! Domain models for the triage engine.

mod assessment;
mod medicine;
mod option;
mod patient;

pub use assessment::*;
pub use medicine::*;
pub use option::*;
pub use patient::*;
