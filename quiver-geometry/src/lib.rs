pub mod marks;
pub mod rtree;

pub use geo_types;
pub use rtree::CoreInstance;
