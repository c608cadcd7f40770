use async_trait::async_trait;
use sqlx::SqliteConnection;

use crate::{
    models::{
        posts::{Post, PostDetail, PostStatus, PostSummary},
        taxonomy::TaxonomyKind,
    },
    Error, Result,
};

use super::{
    begin_write, now_timestamp,
    taxonomy_repo::{find_for_post, link_to_post, unlink_post},
    SqliteRepo, WriteOutcome,
};

#[async_trait]
pub trait PostsRepository: Sync + Send {
    async fn get_posts(&self) -> Result<Vec<PostSummary>>;
    async fn get_post(&self, post_id: i64) -> Result<Option<PostDetail>>;
    async fn create_post(
        &self,
        title: &str,
        content: &str,
        status: PostStatus,
        category_ids: &[i64],
        tag_ids: &[i64],
    ) -> Result<PostDetail>;
    async fn update_post(
        &self,
        post_id: i64,
        title: &str,
        content: Option<&str>,
        status: Option<PostStatus>,
        category_ids: &[i64],
        tag_ids: &[i64],
    ) -> Result<PostDetail>;
    async fn delete_post(&self, post_id: i64) -> Result<()>;
}

#[async_trait]
impl PostsRepository for SqliteRepo {
    async fn get_posts(&self) -> Result<Vec<PostSummary>> {
        let posts = sqlx::query_as::<_, PostSummary>(
            r#"
            SELECT id, title, status, created_at, updated_at
            FROM posts
            ORDER BY updated_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(posts)
    }

    async fn get_post(&self, post_id: i64) -> Result<Option<PostDetail>> {
        // One read transaction keeps the row and its associations on the same snapshot.
        let mut tx = self.pool.begin().await?;
        let post = find_post_detail(&mut tx, post_id).await?;
        tx.commit().await?;
        Ok(post)
    }

    async fn create_post(
        &self,
        title: &str,
        content: &str,
        status: PostStatus,
        category_ids: &[i64],
        tag_ids: &[i64],
    ) -> Result<PostDetail> {
        let now = now_timestamp();
        let mut tx = begin_write(&self.pool).await?;

        let outcome: WriteOutcome = sqlx::query(
            r#"
            INSERT INTO posts (title, content, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(status)
        .bind(now.as_str())
        .bind(now.as_str())
        .execute(&mut *tx)
        .await?
        .into();

        let post_id = outcome.generated_id;
        link_to_post(&mut tx, TaxonomyKind::Category, post_id, category_ids).await?;
        link_to_post(&mut tx, TaxonomyKind::Tag, post_id, tag_ids).await?;

        let post = find_post_detail(&mut tx, post_id)
            .await?
            .ok_or(Error::InternalServerError)?;

        tx.commit().await?;
        Ok(post)
    }

    async fn update_post(
        &self,
        post_id: i64,
        title: &str,
        content: Option<&str>,
        status: Option<PostStatus>,
        category_ids: &[i64],
        tag_ids: &[i64],
    ) -> Result<PostDetail> {
        let mut tx = begin_write(&self.pool).await?;

        if !post_exists(&mut tx, post_id).await? {
            return Err(Error::NotFound);
        }

        let outcome: WriteOutcome = sqlx::query(
            r#"
            UPDATE posts
            SET title = ?,
                content = COALESCE(?, content),
                status = COALESCE(?, status),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(status)
        .bind(now_timestamp())
        .bind(post_id)
        .execute(&mut *tx)
        .await?
        .into();

        if outcome.rows_affected == 0 {
            return Err(Error::NotFound);
        }

        // Full replace: the given lists become the association sets.
        unlink_post(&mut tx, TaxonomyKind::Category, post_id).await?;
        unlink_post(&mut tx, TaxonomyKind::Tag, post_id).await?;
        link_to_post(&mut tx, TaxonomyKind::Category, post_id, category_ids).await?;
        link_to_post(&mut tx, TaxonomyKind::Tag, post_id, tag_ids).await?;

        let post = find_post_detail(&mut tx, post_id)
            .await?
            .ok_or(Error::NotFound)?;

        tx.commit().await?;
        Ok(post)
    }

    async fn delete_post(&self, post_id: i64) -> Result<()> {
        let mut tx = begin_write(&self.pool).await?;

        if !post_exists(&mut tx, post_id).await? {
            return Err(Error::NotFound);
        }

        unlink_post(&mut tx, TaxonomyKind::Category, post_id).await?;
        unlink_post(&mut tx, TaxonomyKind::Tag, post_id).await?;

        let outcome: WriteOutcome = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(post_id)
            .execute(&mut *tx)
            .await?
            .into();

        if outcome.rows_affected == 0 {
            return Err(Error::NotFound);
        }

        tx.commit().await?;
        Ok(())
    }
}

async fn post_exists(conn: &mut SqliteConnection, post_id: i64) -> Result<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM posts WHERE id = ?")
        .bind(post_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(found.is_some())
}

async fn find_post_detail(conn: &mut SqliteConnection, post_id: i64) -> Result<Option<PostDetail>> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, title, content, status, created_at, updated_at
        FROM posts
        WHERE id = ?
        "#,
    )
    .bind(post_id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(post) = post else {
        return Ok(None);
    };

    let categories = find_for_post(conn, TaxonomyKind::Category, post_id).await?;
    let tags = find_for_post(conn, TaxonomyKind::Tag, post_id).await?;

    Ok(Some(PostDetail {
        post,
        categories,
        tags,
    }))
}
