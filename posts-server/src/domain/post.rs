use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type PostId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when creating a post. The store assigns `id`,
/// `created_at` and starts every post unpublished.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
}

/// General partial update. Publication state is not reachable from here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Partial change set handed to the repository; `None` leaves a column as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub published: Option<bool>,
}

impl PostChanges {
    pub fn publication(published: bool) -> Self {
        Self {
            published: Some(published),
            ..Self::default()
        }
    }

    pub fn apply_to(self, post: &mut Post) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(content) = self.content {
            post.content = content;
        }
        if let Some(published) = self.published {
            post.published = published;
        }
    }
}

impl From<PostUpdate> for PostChanges {
    fn from(update: PostUpdate) -> Self {
        Self {
            title: update.title,
            content: update.content,
            published: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> Post {
        Post {
            id: 7,
            title: "Title".into(),
            content: "Body".into(),
            published: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn publication_touches_only_the_flag() {
        let mut target = post();
        let before = target.clone();

        PostChanges::publication(true).apply_to(&mut target);

        assert!(target.published);
        assert_eq!(target.title, before.title);
        assert_eq!(target.content, before.content);
        assert_eq!(target.created_at, before.created_at);
    }

    #[test]
    fn update_never_carries_publication_state() {
        let changes = PostChanges::from(PostUpdate {
            title: Some("New".into()),
            content: None,
        });

        assert_eq!(changes.published, None);

        let mut target = post();
        changes.apply_to(&mut target);
        assert_eq!(target.title, "New");
        assert_eq!(target.content, "Body");
        assert!(!target.published);
    }
}
