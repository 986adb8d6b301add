//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresProgressRepository` - Navigation progress rows
//! - `PostgresStepDataRepository` - Versioned step payloads with tombstones
//! - `PostgresLearnerRepository` - Learner classification and completions
//! - `PostgresCheckpointRepository` - Checkpoints, transactional capture and restore

mod checkpoint_repository;
mod learner_repository;
mod progress_repository;
mod rows;
mod step_data_repository;

pub use checkpoint_repository::PostgresCheckpointRepository;
pub use learner_repository::PostgresLearnerRepository;
pub use progress_repository::PostgresProgressRepository;
pub use step_data_repository::PostgresStepDataRepository;
