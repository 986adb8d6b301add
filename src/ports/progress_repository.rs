//! Progress repository port.
//!
//! One `NavigationProgress` row per (learner, track). Writes go through
//! [`ProgressRepository::apply`], which reads and rewrites the row as one
//! atomic step so concurrent merges cannot lose each other's watch progress.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, LearnerId, TrackId, Timestamp};
use crate::domain::progress::{NavigationProgress, ProgressChange};

/// Repository port for navigation progress.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Find the stored record for a learner and track.
    async fn find(
        &self,
        learner_id: LearnerId,
        track_id: &TrackId,
    ) -> Result<Option<NavigationProgress>, DomainError>;

    /// Apply `change` to the stored record for `initial`'s (learner, track)
    /// and persist the result.
    ///
    /// `initial` is used when no row exists yet. The read, the change and
    /// the write happen while the row is held exclusively; a concurrent
    /// `apply` for the same row observes this one's result.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn apply(
        &self,
        initial: NavigationProgress,
        change: &ProgressChange,
        now: Timestamp,
    ) -> Result<NavigationProgress, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn ProgressRepository) {}
    }
}
