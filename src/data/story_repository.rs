use crate::domain::error::DomainError;
use crate::domain::models::{Story, StoryFilter};
use crate::domain::repository::{StoryMutation, StoryRepository};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

struct StoredStory {
    // insertion order, breaks created_at ties
    seq: u64,
    story: Story,
}

#[derive(Default)]
struct StoryStore {
    documents: HashMap<String, StoredStory>,
    next_seq: u64,
}

#[derive(Clone, Default)]
pub struct InMemoryStoryRepository {
    storage: Arc<RwLock<StoryStore>>,
}

impl InMemoryStoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoryRepository for InMemoryStoryRepository {
    #[instrument(skip(self, story), fields(story_id = %story.id, author_id = %story.author_id))]
    async fn insert(&self, story: Story) -> Result<()> {
        trace!("Acquiring write lock for story storage");
        let mut storage = self.storage.write().await;
        let seq = storage.next_seq;
        storage.next_seq += 1;
        let id = story.id.clone();
        storage.documents.insert(id.clone(), StoredStory { seq, story });
        debug!(story_id = %id, seq = seq, "Story saved to memory storage");
        Ok(())
    }

    #[instrument(skip(self), fields(story_id = id))]
    async fn find_by_id(&self, id: &str) -> Result<Option<Story>> {
        trace!("Acquiring read lock for story storage");
        let storage = self.storage.read().await;
        let story = storage.documents.get(id).map(|stored| stored.story.clone());
        if story.is_none() {
            trace!(story_id = id, "Story not found in storage");
        }
        Ok(story)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: &StoryFilter) -> Result<Vec<Story>> {
        trace!("Acquiring read lock for story storage");
        let storage = self.storage.read().await;
        let mut hits: Vec<&StoredStory> = storage
            .documents
            .values()
            .filter(|stored| stored.story.matches(filter))
            .collect();
        hits.sort_by(|a, b| {
            b.story
                .created_at
                .cmp(&a.story.created_at)
                .then(b.seq.cmp(&a.seq))
        });
        debug!(count = hits.len(), "Stories matched filter");
        Ok(hits.into_iter().map(|stored| stored.story.clone()).collect())
    }

    #[instrument(skip(self, mutation), fields(story_id = id))]
    async fn modify(&self, id: &str, mutation: StoryMutation) -> Result<Story> {
        trace!("Acquiring write lock for story storage");
        let mut storage = self.storage.write().await;
        let stored = storage
            .documents
            .get_mut(id)
            .ok_or_else(DomainError::story_not_found)?;

        // Mutate a copy so a rejected mutation never reaches the stored document
        let mut draft = stored.story.clone();
        mutation(&mut draft)?;
        stored.story = draft.clone();
        debug!(story_id = id, "Story updated in memory storage");
        Ok(draft)
    }

    #[instrument(skip(self), fields(story_id = id))]
    async fn delete(&self, id: &str) -> Result<bool> {
        trace!("Acquiring write lock for story storage");
        let mut storage = self.storage.write().await;
        let removed = storage.documents.remove(id).is_some();
        debug!(story_id = id, removed = removed, "Story delete attempted");
        Ok(removed)
    }
}
