pub mod gesture;
pub mod landmark;

pub use gesture::*;
pub use landmark::*;
