pub mod config;
pub mod error;
pub mod joint;
pub mod logging;
pub mod point;
