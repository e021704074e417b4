pub mod orchestrator;
pub mod selection;
pub mod translate;
