use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Author of a post, stored as a structured name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub first_name: String,
    pub last_name: String,
}

impl Author {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Display name exposed on the wire: first and last name joined by one space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Author fields that may or may not have been supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialAuthor {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl PartialAuthor {
    fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none()
    }
}

/// Fields used to create a post. Nothing is guaranteed present until
/// [`Post::new`] has validated them.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: Option<String>,
    pub author: Option<PartialAuthor>,
    pub content: Option<String>,
    /// Creation time; defaults to now.
    pub created: Option<DateTime<Utc>>,
}

impl NewPost {
    /// Fully populated creation fields.
    pub fn new(title: impl Into<String>, author: Author, content: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            author: Some(PartialAuthor {
                first_name: Some(author.first_name),
                last_name: Some(author.last_name),
            }),
            content: Some(content.into()),
            created: None,
        }
    }

    pub fn created_at(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }
}

/// Partial update of a post. `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostChanges {
    pub title: Option<String>,
    pub author: Option<PartialAuthor>,
    pub content: Option<String>,
}

impl PostChanges {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// True when applying these changes would modify nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.author.as_ref().is_none_or(PartialAuthor::is_empty)
    }

    /// Supplied values must not blank out a required field.
    pub fn validate(&self) -> Result<(), DomainError> {
        check_not_empty("title", self.title.as_deref())?;
        check_not_empty("content", self.content.as_deref())?;
        if let Some(author) = &self.author {
            check_not_empty("author.firstName", author.first_name.as_deref())?;
            check_not_empty("author.lastName", author.last_name.as_deref())?;
        }
        Ok(())
    }
}

/// Wire shape of a post: the author collapses to a display name and the
/// timestamp to RFC 3339.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostView {
    pub id: String,
    pub title: String,
    pub author: String,
    pub content: String,
    pub created: String,
}

/// Post entity - a blog post document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub author: Author,
    pub content: String,
    pub created: DateTime<Utc>,
}

impl Post {
    /// Create a new post with a fresh id.
    ///
    /// Fails with [`DomainError::Validation`] naming the first required field
    /// that is missing or empty.
    pub fn new(fields: NewPost) -> Result<Self, DomainError> {
        let title = required("title", fields.title)?;
        let author = fields.author.ok_or_else(|| DomainError::missing_field("author"))?;
        let first_name = required("author.firstName", author.first_name)?;
        let last_name = required("author.lastName", author.last_name)?;
        let content = required("content", fields.content)?;

        Ok(Self {
            id: Uuid::new_v4(),
            title,
            author: Author {
                first_name,
                last_name,
            },
            content,
            created: fields.created.unwrap_or_else(Utc::now),
        })
    }

    /// Overwrite the supplied fields. `id` and `created` never change.
    pub fn apply(&mut self, changes: PostChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
        if let Some(author) = changes.author {
            if let Some(first_name) = author.first_name {
                self.author.first_name = first_name;
            }
            if let Some(last_name) = author.last_name {
                self.author.last_name = last_name;
            }
        }
    }

    /// Public wire representation.
    pub fn serialize(&self) -> PostView {
        PostView {
            id: self.id.to_string(),
            title: self.title.clone(),
            author: self.author.full_name(),
            content: self.content.clone(),
            created: self.created.to_rfc3339(),
        }
    }
}

fn required(field: &str, value: Option<String>) -> Result<String, DomainError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(DomainError::missing_field(field)),
    }
}

fn check_not_empty(field: &str, value: Option<&str>) -> Result<(), DomainError> {
    match value {
        Some("") => Err(DomainError::missing_field(field)),
        _ => Ok(()),
    }
}
