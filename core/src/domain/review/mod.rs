pub mod entities;
pub mod session;

pub use entities::*;
pub use session::*;
