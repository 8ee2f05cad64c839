pub mod error;
pub mod ordinal;
