pub mod digest;
pub mod error;

pub use digest::*;
pub use error::*;
