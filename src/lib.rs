pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

mod app;

pub use app::run;
pub use application::{ImportOutcome, LeadWorkflow, SearchOutcome};
pub use domain::error::{AppError, Result};
pub use domain::lead::{LeadRow, RowSet, ValidationStatus};
pub use domain::workflow_config::WorkflowConfig;
