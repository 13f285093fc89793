pub mod config;
pub mod email_validator;
pub mod logging;
pub mod security;
