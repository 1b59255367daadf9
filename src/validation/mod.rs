//! Well-formedness checks for incoming fixes

pub mod fix;

pub use fix::{check_fix, FixError};
