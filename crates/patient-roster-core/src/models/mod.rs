//! Domain models for the patient roster.

mod draft;
mod notification;
mod patient;

pub use draft::*;
pub use notification::*;
pub use patient::*;
