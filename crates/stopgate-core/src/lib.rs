pub mod error;
pub mod gate;
pub mod manager;
pub mod payload;
pub mod project;
pub mod response;
pub mod runner;
pub mod truncate;

pub use error::{GateError, Result};
