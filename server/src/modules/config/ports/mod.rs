// Config Ports Layer

mod config_error;

pub use config_error::*;
