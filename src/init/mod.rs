pub mod env;
pub mod logging;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
