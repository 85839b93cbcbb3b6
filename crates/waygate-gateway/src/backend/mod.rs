//! Backend module.

mod adapters;

pub use adapters::{FnBackend, StaticBackend};
