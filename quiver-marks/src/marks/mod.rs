pub mod anchor;
pub mod mark;
pub mod shape;
