//! Data models mirrored from the HMS REST backend.
//!
//! These are plain records; the backend owns every invariant. Deserialization
//! is lenient where the backend is known to vary (numbers as strings,
//! missing optional names, unexpected status labels).

mod appointment;
mod doctor;
mod invoice;
mod numeric;
mod prescription;
mod user;

pub use appointment::*;
pub use doctor::*;
pub use invoice::*;
pub use numeric::*;
pub use prescription::*;
pub use user::*;
