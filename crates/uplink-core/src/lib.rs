pub mod config;
pub mod logging;

pub mod document;
pub mod filter;
pub mod oracle;
pub mod owner;
pub mod upload_path;
