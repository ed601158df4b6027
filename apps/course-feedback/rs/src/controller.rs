use crate::entry::{FeedbackEntry, NewFeedbackRow};
use crate::error::StoreError;
use crate::form::SubmitFeedback;
use crate::store::FeedbackStore;

/// Holds the last accepted entry and writes new ones to the store.
pub struct PageController<S> {
    store: S,
    latest: Option<FeedbackEntry>,
}

impl<S: FeedbackStore> PageController<S> {
    pub fn new(store: S) -> Self {
        Self { store, latest: None }
    }

    pub fn latest(&self) -> Option<&FeedbackEntry> {
        self.latest.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Insert `entry` and, on success, make the stored copy the latest.
    /// On failure `latest` is left untouched.
    pub async fn record(&mut self, entry: &FeedbackEntry) -> Result<&FeedbackEntry, StoreError> {
        let row = NewFeedbackRow::from(entry);
        match self.store.insert(&row).await {
            Ok(stored) => {
                tracing::info!(
                    id = ?stored.id,
                    course = %stored.row.course_name,
                    rating = stored.row.rating,
                    "feedback stored"
                );
                Ok(&*self.latest.insert(stored.into()))
            }
            Err(e) => {
                tracing::error!(course = %entry.course_name, "error inserting feedback: {}", e);
                Err(e)
            }
        }
    }
}

impl<S: FeedbackStore> SubmitFeedback for PageController<S> {
    async fn submit_feedback(&mut self, entry: FeedbackEntry) -> Result<(), StoreError> {
        self.record(&entry).await.map(|_| ())
    }
}
