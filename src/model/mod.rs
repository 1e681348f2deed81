//! Value types shared by the configuration model.
//!
//! [`SbomSpecification`] is the `name:version` identifier for document
//! formats; the remaining types are the payloads of structured settings.

mod entities;
mod specification;

pub use entities::*;
pub use specification::*;
