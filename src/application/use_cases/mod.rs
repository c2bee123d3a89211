pub mod lead_workflow;
pub mod reconcile;
