use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::taxonomy::Taxonomy;

#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    pub fn to_str(&self) -> &str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone, PartialEq)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row shape returned by the post listing; associations are not loaded.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone, PartialEq)]
pub struct PostSummary {
    pub id: i64,
    pub title: String,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A post together with its categories and tags. Both lists are always
/// present and ordered by name.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub categories: Vec<Taxonomy>,
    pub tags: Vec<Taxonomy>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreatePostDto {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PostStatus>,
    #[serde(rename = "categoryIds", default)]
    pub category_ids: Vec<i64>,
    #[serde(rename = "tagIds", default)]
    pub tag_ids: Vec<i64>,
}

/// Body of `PUT /posts/{id}`. Omitted `content`/`status` keep their stored
/// values; omitted id lists clear the associations.
#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdatePostDto {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PostStatus>,
    #[serde(rename = "categoryIds", default)]
    pub category_ids: Vec<i64>,
    #[serde(rename = "tagIds", default)]
    pub tag_ids: Vec<i64>,
}
