use std::{collections::HashSet, sync::Arc};

use tracing::info;
use validator::Validate;

use crate::{
    models::posts::{CreatePostDto, PostDetail, PostSummary, UpdatePostDto},
    repositories::posts_repo::PostsRepository,
    Error, Result,
};

#[derive(Clone)]
pub struct PostsService {
    repo: Arc<dyn PostsRepository>,
}

impl PostsService {
    pub fn new(repo: Arc<dyn PostsRepository>) -> Self {
        Self { repo }
    }

    pub async fn get_posts(&self) -> Result<Vec<PostSummary>> {
        let posts = self.repo.get_posts().await?;
        Ok(posts)
    }

    pub async fn get_post(&self, post_id: i64) -> Result<PostDetail> {
        self.repo.get_post(post_id).await?.ok_or(Error::NotFound)
    }

    pub async fn create_post(&self, new_post: CreatePostDto) -> Result<PostDetail> {
        new_post.validate()?;

        let category_ids = unique_ids(&new_post.category_ids);
        let tag_ids = unique_ids(&new_post.tag_ids);

        let post = self
            .repo
            .create_post(
                &new_post.title,
                &new_post.content,
                new_post.status.unwrap_or_default(),
                &category_ids,
                &tag_ids,
            )
            .await?;

        info!(
            post_id = post.post.id,
            status = post.post.status.to_str(),
            "post created"
        );
        Ok(post)
    }

    pub async fn update_post(&self, post_id: i64, changes: UpdatePostDto) -> Result<PostDetail> {
        changes.validate()?;

        let category_ids = unique_ids(&changes.category_ids);
        let tag_ids = unique_ids(&changes.tag_ids);

        let post = self
            .repo
            .update_post(
                post_id,
                &changes.title,
                changes.content.as_deref(),
                changes.status,
                &category_ids,
                &tag_ids,
            )
            .await?;

        info!(post_id, "post updated");
        Ok(post)
    }

    pub async fn delete_post(&self, post_id: i64) -> Result<()> {
        self.repo.delete_post(post_id).await?;
        info!(post_id, "post deleted");
        Ok(())
    }
}

/// Drops repeated ids, keeping the first occurrence of each.
fn unique_ids(ids: &[i64]) -> Vec<i64> {
    let mut seen = HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;
    use crate::models::posts::{Post, PostStatus};

    #[derive(Default)]
    struct RecordingRepo {
        writes: Mutex<Vec<(String, PostStatus, Vec<i64>, Vec<i64>)>>,
    }

    fn detail(id: i64, title: &str, status: PostStatus) -> PostDetail {
        let now = Utc::now();
        PostDetail {
            post: Post {
                id,
                title: title.to_string(),
                content: String::new(),
                status,
                created_at: now,
                updated_at: now,
            },
            categories: vec![],
            tags: vec![],
        }
    }

    #[async_trait]
    impl PostsRepository for RecordingRepo {
        async fn get_posts(&self) -> Result<Vec<PostSummary>> {
            Ok(vec![])
        }

        async fn get_post(&self, _post_id: i64) -> Result<Option<PostDetail>> {
            Ok(None)
        }

        async fn create_post(
            &self,
            title: &str,
            _content: &str,
            status: PostStatus,
            category_ids: &[i64],
            tag_ids: &[i64],
        ) -> Result<PostDetail> {
            self.writes.lock().unwrap().push((
                title.to_string(),
                status,
                category_ids.to_vec(),
                tag_ids.to_vec(),
            ));
            Ok(detail(1, title, status))
        }

        async fn update_post(
            &self,
            post_id: i64,
            title: &str,
            _content: Option<&str>,
            status: Option<PostStatus>,
            category_ids: &[i64],
            tag_ids: &[i64],
        ) -> Result<PostDetail> {
            let status = status.unwrap_or_default();
            self.writes.lock().unwrap().push((
                title.to_string(),
                status,
                category_ids.to_vec(),
                tag_ids.to_vec(),
            ));
            Ok(detail(post_id, title, status))
        }

        async fn delete_post(&self, _post_id: i64) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn unique_ids_keeps_first_occurrence_order() {
        assert_eq!(unique_ids(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
        assert!(unique_ids(&[]).is_empty());
    }

    #[tokio::test]
    async fn create_without_content_is_rejected_before_any_write() {
        let repo = Arc::new(RecordingRepo::default());
        let service = PostsService::new(repo.clone());

        let err = service
            .create_post(CreatePostDto {
                title: "Hi".to_string(),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, Error::BadRequest(ref msg) if msg == "Content is required"));
        assert!(repo.writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_defaults_to_draft_and_dedupes_ids() {
        let repo = Arc::new(RecordingRepo::default());
        let service = PostsService::new(repo.clone());

        let post = service
            .create_post(CreatePostDto {
                title: "Hi".to_string(),
                content: "Body".to_string(),
                status: None,
                category_ids: vec![2, 2, 1],
                tag_ids: vec![5, 5],
            })
            .await
            .unwrap();

        assert_eq!(post.post.status, PostStatus::Draft);
        let writes = repo.writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].2, vec![2, 1]);
        assert_eq!(writes[0].3, vec![5]);
    }

    #[tokio::test]
    async fn update_requires_a_title() {
        let repo = Arc::new(RecordingRepo::default());
        let service = PostsService::new(repo.clone());

        let err = service
            .update_post(1, UpdatePostDto::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::BadRequest(_)));
        assert!(repo.writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_post_is_not_found() {
        let service = PostsService::new(Arc::new(RecordingRepo::default()));
        assert!(matches!(service.get_post(42).await, Err(Error::NotFound)));
    }
}
