pub mod lighthouse;
pub mod synthetic;
pub mod traits;
