pub mod monitor;
pub mod validate;
