pub mod marks;

pub use quiver_common::value::PropertyValue;
