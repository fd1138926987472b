pub mod scaling;
pub mod value_objects;

pub use scaling::*;
pub use value_objects::*;
