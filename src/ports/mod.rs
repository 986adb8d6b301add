//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `ProgressRepository` - Navigation progress per (learner, track)
//! - `StepDataRepository` - Versioned, soft-deletable step payloads
//! - `LearnerRepository` - Learner classification and completion records
//! - `CheckpointRepository` - Snapshots with atomic capture and restore
//!
//! ## Collaborator Ports
//!
//! - `ArtifactGenerator` - Summary artifact generation on completion
//! - `SessionValidator` - Bearer token to learner identity

mod artifact_generator;
mod checkpoint_repository;
mod learner_repository;
mod progress_repository;
mod session_validator;
mod step_data_repository;

pub use artifact_generator::{artifact_failed, ArtifactGenerator};
pub use checkpoint_repository::CheckpointRepository;
pub use learner_repository::LearnerRepository;
pub use progress_repository::ProgressRepository;
pub use session_validator::SessionValidator;
pub use step_data_repository::{version_conflict, StepDataRepository};
