use crate::domain::error::DomainError;
use crate::domain::tags::{TagsInput, parse_tag_query};
use crate::domain::user::UserSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author_id: String,
    /// Author's display name at the time the comment was written.
    pub author_name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub image: String,
    pub tags: Vec<String>,
    pub author_id: String,
    pub likes: Vec<String>,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of a create request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoryFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub image: Option<String>,
    pub tags: Option<TagsInput>,
}

/// Body of an update request; absent fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoryPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub image: Option<String>,
    pub tags: Option<TagsInput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoryFilter {
    pub q: Option<String>,
    pub tags: Option<String>,
    pub user: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddComment {
    pub text: String,
}

fn required_title(title: Option<&str>) -> Result<String, DomainError> {
    match title.map(str::trim) {
        Some(t) if !t.is_empty() => Ok(t.to_string()),
        _ => Err(DomainError::Validation("Title is required".to_string())),
    }
}

impl Story {
    pub fn new(author_id: &str, fields: StoryFields) -> Result<Self, DomainError> {
        let title = required_title(fields.title.as_deref())?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            title,
            description: fields.description.unwrap_or_default(),
            location: fields.location.unwrap_or_default(),
            image: fields.image.unwrap_or_default(),
            tags: fields.tags.map(|t| t.normalize()).unwrap_or_default(),
            author_id: author_id.to_string(),
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.author_id == user_id
    }

    pub fn ensure_owner(&self, actor_id: &str) -> Result<(), DomainError> {
        if self.is_owned_by(actor_id) {
            Ok(())
        } else {
            Err(DomainError::not_authorized())
        }
    }

    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likes.iter().any(|id| id == user_id)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Validates everything up front so a rejected patch changes nothing.
    pub fn apply_patch(&mut self, actor_id: &str, patch: StoryPatch) -> Result<(), DomainError> {
        self.ensure_owner(actor_id)?;
        let title = match patch.title.as_deref() {
            Some(t) => Some(required_title(Some(t))?),
            None => None,
        };

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags.normalize();
        }
        self.touch();
        Ok(())
    }

    /// Returns whether the actor likes the story afterwards.
    pub fn toggle_like(&mut self, actor_id: &str) -> bool {
        let liked = match self.likes.iter().position(|id| id == actor_id) {
            Some(index) => {
                self.likes.remove(index);
                false
            }
            None => {
                self.likes.push(actor_id.to_string());
                true
            }
        };
        self.touch();
        liked
    }

    pub fn remove_like(&mut self, actor_id: &str, target_user_id: &str) -> Result<(), DomainError> {
        self.ensure_owner(actor_id)?;
        let index = self
            .likes
            .iter()
            .position(|id| id == target_user_id)
            .ok_or_else(|| DomainError::NotFound("Like not found".to_string()))?;
        self.likes.remove(index);
        self.touch();
        Ok(())
    }

    pub fn add_comment(
        &mut self,
        actor_id: &str,
        author_name: &str,
        text: &str,
    ) -> Result<Comment, DomainError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::Validation(
                "Comment text is required".to_string(),
            ));
        }
        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            author_id: actor_id.to_string(),
            author_name: author_name.to_string(),
            text: text.to_string(),
            created_at: Utc::now(),
        };
        self.comments.push(comment.clone());
        self.touch();
        Ok(comment)
    }

    /// Comment author and story author may both remove a comment.
    pub fn remove_comment(&mut self, actor_id: &str, comment_id: &str) -> Result<Comment, DomainError> {
        let index = self
            .comments
            .iter()
            .position(|c| c.id == comment_id)
            .ok_or_else(|| DomainError::NotFound("Comment not found".to_string()))?;

        if self.comments[index].author_id != actor_id && !self.is_owned_by(actor_id) {
            return Err(DomainError::not_authorized());
        }

        let removed = self.comments.remove(index);
        self.touch();
        Ok(removed)
    }

    pub fn matches(&self, filter: &StoryFilter) -> bool {
        if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let needle = q.to_lowercase();
            let hit = [&self.title, &self.description, &self.location]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if let Some(raw) = filter.tags.as_deref() {
            let wanted = parse_tag_query(raw);
            if !wanted.is_empty() && !wanted.iter().any(|t| self.tags.contains(t)) {
                return false;
            }
        }

        if let Some(user) = filter.user.as_deref().filter(|u| !u.is_empty()) {
            if self.author_id != user {
                return false;
            }
        }

        true
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub id: String,
    pub author: UserSummary,
    pub name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A story with every user reference resolved for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub image: String,
    pub tags: Vec<String>,
    pub author: UserSummary,
    pub likes: Vec<UserSummary>,
    pub comments: Vec<CommentView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoryView {
    pub fn resolve<F>(story: Story, mut lookup: F) -> Self
    where
        F: FnMut(&str) -> UserSummary,
    {
        let author = lookup(story.author_id.as_str());
        let likes = story.likes.iter().map(|id| lookup(id.as_str())).collect();
        let comments = story
            .comments
            .into_iter()
            .map(|c| CommentView {
                author: lookup(c.author_id.as_str()),
                id: c.id,
                name: c.author_name,
                text: c.text,
                created_at: c.created_at,
            })
            .collect();

        Self {
            id: story.id,
            title: story.title,
            description: story.description,
            location: story.location,
            image: story.image,
            tags: story.tags,
            author,
            likes,
            comments,
            created_at: story.created_at,
            updated_at: story.updated_at,
        }
    }

    pub fn like_ids(&self) -> Vec<&str> {
        self.likes.iter().map(|u| u.id.as_str()).collect()
    }
}
