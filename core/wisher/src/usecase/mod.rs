pub mod app;
pub mod composer;
pub mod history_ledger;
pub mod orchestrator;
