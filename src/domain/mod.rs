pub mod error;
pub mod model;
pub mod script;
pub mod selection;
pub mod traits;
