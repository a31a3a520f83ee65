//! Basic linear algebra data types for the assembly core.

mod csr;
mod error_types;
mod floats;

pub use csr::*;
pub use error_types::*;
pub use floats::*;
