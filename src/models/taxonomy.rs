use serde::{Deserialize, Serialize};
use validator::Validate;

/// A category or a tag. Both tables share the `(id, name)` shape.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaxonomyKind {
    Category,
    Tag,
}

impl TaxonomyKind {
    /// Table name; also the collection segment under `/api`.
    pub fn table(&self) -> &'static str {
        match self {
            Self::Category => "categories",
            Self::Tag => "tags",
        }
    }

    pub fn join_table(&self) -> &'static str {
        match self {
            Self::Category => "post_categories",
            Self::Tag => "post_tags",
        }
    }

    pub fn join_column(&self) -> &'static str {
        match self {
            Self::Category => "category_id",
            Self::Tag => "tag_id",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::Tag => "Tag",
        }
    }
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct TaxonomyDto {
    #[serde(default)]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
}
