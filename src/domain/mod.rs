pub mod error;
pub mod lead;
pub mod phone;
pub mod search;
pub mod workflow_config;
