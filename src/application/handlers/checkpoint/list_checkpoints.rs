//! ListCheckpointsHandler - Query handler for a learner's checkpoints.

use std::sync::Arc;

use crate::domain::checkpoint::{Checkpoint, CheckpointError};
use crate::domain::foundation::LearnerId;
use crate::ports::CheckpointRepository;

#[derive(Debug, Clone)]
pub struct ListCheckpointsQuery {
    pub learner_id: LearnerId,
}

/// Lists checkpoints newest first.
pub struct ListCheckpointsHandler {
    checkpoints: Arc<dyn CheckpointRepository>,
}

impl ListCheckpointsHandler {
    pub fn new(checkpoints: Arc<dyn CheckpointRepository>) -> Self {
        Self { checkpoints }
    }

    pub async fn handle(&self, query: ListCheckpointsQuery) -> Result<Vec<Checkpoint>, CheckpointError> {
        Ok(self.checkpoints.list_for_learner(query.learner_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryWorkshopStore;
    use crate::domain::checkpoint::CheckpointData;
    use crate::domain::foundation::Timestamp;

    #[tokio::test]
    async fn returns_newest_first_for_owner_only() {
        let store = Arc::new(InMemoryWorkshopStore::new());
        let owner = LearnerId::new(1).unwrap();
        let other = LearnerId::new(2).unwrap();
        let now = Timestamp::now();
        for (learner, name, at) in [
            (owner, "old", now.minus_days(2)),
            (owner, "new", now),
            (other, "foreign", now),
        ] {
            let cp = Checkpoint::new(learner, name, None, CheckpointData::default(), at).unwrap();
            CheckpointRepository::save(&*store, &cp).await.unwrap();
        }

        let list = ListCheckpointsHandler::new(store)
            .handle(ListCheckpointsQuery { learner_id: owner })
            .await
            .unwrap();

        let names: Vec<&str> = list.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["new", "old"]);
    }
}
