use crate::domain::error::DomainError;
use crate::domain::models::{Story, StoryFields, StoryFilter, StoryPatch, StoryView};
use crate::domain::repository::{StoryRepository, UserRepository};
use crate::domain::user::UserSummary;
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Story aggregate operations. Every story handed back has its user references resolved.
pub struct StoryService<S: StoryRepository, U: UserRepository> {
    stories: Arc<S>,
    users: Arc<U>,
}

impl<S: StoryRepository, U: UserRepository> StoryService<S, U> {
    pub fn new(stories: Arc<S>, users: Arc<U>) -> Self {
        Self { stories, users }
    }

    async fn resolve_views(&self, stories: Vec<Story>) -> Result<Vec<StoryView>> {
        let mut ids: Vec<String> = Vec::new();
        for story in &stories {
            ids.push(story.author_id.clone());
            ids.extend(story.likes.iter().cloned());
            ids.extend(story.comments.iter().map(|c| c.author_id.clone()));
        }
        ids.sort();
        ids.dedup();

        let directory: HashMap<String, UserSummary> = self
            .users
            .find_users_by_ids(&ids)
            .await?
            .iter()
            .map(|u| (u.id.clone(), UserSummary::from(u)))
            .collect();

        Ok(stories
            .into_iter()
            .map(|story| {
                StoryView::resolve(story, |id| {
                    directory
                        .get(id)
                        .cloned()
                        .unwrap_or_else(|| UserSummary::unknown(id))
                })
            })
            .collect())
    }

    async fn resolve_view(&self, story: Story) -> Result<StoryView> {
        let mut views = self.resolve_views(vec![story]).await?;
        views.pop().ok_or_else(|| {
            DomainError::Internal("Story resolution produced no view".to_string()).into()
        })
    }

    #[instrument(skip(self, input), fields(story_id))]
    pub async fn create(&self, author_id: &str, input: StoryFields) -> Result<StoryView> {
        let story = Story::new(author_id, input).inspect_err(|e| {
            warn!(error = %e, "Rejected story creation");
        })?;
        tracing::Span::current().record("story_id", story.id.as_str());

        self.stories.insert(story.clone()).await?;
        info!(story_id = %story.id, tags = story.tags.len(), "Story created");
        self.resolve_view(story).await
    }

    #[instrument(skip(self))]
    pub async fn list(&self, filter: &StoryFilter) -> Result<Vec<StoryView>> {
        let stories = self.stories.list(filter).await?;
        debug!(count = stories.len(), "Listing stories");
        self.resolve_views(stories).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<StoryView> {
        let story = self
            .stories
            .find_by_id(id)
            .await?
            .ok_or_else(DomainError::story_not_found)?;
        self.resolve_view(story).await
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: &str, actor_id: &str, patch: StoryPatch) -> Result<StoryView> {
        let actor = actor_id.to_string();
        let story = self
            .stories
            .modify(id, Box::new(move |story: &mut Story| story.apply_patch(&actor, patch)))
            .await?;
        info!(story_id = id, "Story updated");
        self.resolve_view(story).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str, actor_id: &str) -> Result<()> {
        let story = self
            .stories
            .find_by_id(id)
            .await?
            .ok_or_else(DomainError::story_not_found)?;
        story.ensure_owner(actor_id).inspect_err(|_| {
            warn!(story_id = id, actor_id = actor_id, "Non-owner tried to delete story");
        })?;

        if !self.stories.delete(id).await? {
            return Err(DomainError::story_not_found().into());
        }
        info!(story_id = id, "Story deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn toggle_like(&self, id: &str, actor_id: &str) -> Result<StoryView> {
        let actor = actor_id.to_string();
        let story = self
            .stories
            .modify(
                id,
                Box::new(move |story: &mut Story| {
                    let liked = story.toggle_like(&actor);
                    debug!(liked = liked, "Like toggled");
                    Ok(())
                }),
            )
            .await?;
        info!(story_id = id, likes = story.likes.len(), "Like toggled");
        self.resolve_view(story).await
    }

    #[instrument(skip(self))]
    pub async fn remove_like(
        &self,
        id: &str,
        actor_id: &str,
        target_user_id: &str,
    ) -> Result<StoryView> {
        let actor = actor_id.to_string();
        let target = target_user_id.to_string();
        let story = self
            .stories
            .modify(id, Box::new(move |story: &mut Story| story.remove_like(&actor, &target)))
            .await?;
        info!(story_id = id, removed_user = target_user_id, "Like removed by owner");
        self.resolve_view(story).await
    }

    #[instrument(skip(self, text))]
    pub async fn add_comment(&self, id: &str, actor_id: &str, text: &str) -> Result<StoryView> {
        let author = self
            .users
            .find_user_by_id(actor_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("User not found".to_string()))?;

        let text = text.to_string();
        let story = self
            .stories
            .modify(
                id,
                Box::new(move |story: &mut Story| {
                    story
                        .add_comment(&author.id, &author.name, &text)
                        .map(|_| ())
                }),
            )
            .await?;
        info!(story_id = id, comments = story.comments.len(), "Comment added");
        self.resolve_view(story).await
    }

    #[instrument(skip(self))]
    pub async fn remove_comment(&self, id: &str, actor_id: &str, comment_id: &str) -> Result<()> {
        let actor = actor_id.to_string();
        let comment = comment_id.to_string();
        self.stories
            .modify(
                id,
                Box::new(move |story: &mut Story| story.remove_comment(&actor, &comment).map(|_| ())),
            )
            .await?;
        info!(story_id = id, comment_id = comment_id, "Comment removed");
        Ok(())
    }
}
