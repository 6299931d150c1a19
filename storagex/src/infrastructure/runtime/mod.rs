pub mod orchestrator;

pub use orchestrator::StorageOrchestrator;
