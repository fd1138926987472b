pub mod confidence_value;
pub mod food_entry;
pub mod recognition_result;

pub use confidence_value::*;
pub use food_entry::*;
pub use recognition_result::*;
