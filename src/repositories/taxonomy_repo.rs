use async_trait::async_trait;
use sqlx::SqliteConnection;
use tracing::debug;

use crate::{
    models::taxonomy::{Taxonomy, TaxonomyKind},
    Error, Result,
};

use super::{begin_write, SqliteRepo, WriteOutcome};

#[async_trait]
pub trait TaxonomyRepository: Sync + Send {
    async fn list_taxonomies(&self, kind: TaxonomyKind) -> Result<Vec<Taxonomy>>;
    async fn get_taxonomy(&self, kind: TaxonomyKind, id: i64) -> Result<Option<Taxonomy>>;
    async fn create_taxonomy(&self, kind: TaxonomyKind, name: &str) -> Result<Taxonomy>;
    async fn update_taxonomy(&self, kind: TaxonomyKind, id: i64, name: &str) -> Result<Taxonomy>;
    async fn delete_taxonomy(&self, kind: TaxonomyKind, id: i64) -> Result<()>;
}

#[async_trait]
impl TaxonomyRepository for SqliteRepo {
    async fn list_taxonomies(&self, kind: TaxonomyKind) -> Result<Vec<Taxonomy>> {
        let sql = format!(
            "SELECT id, name FROM {} ORDER BY name ASC, id ASC",
            kind.table()
        );

        let rows = sqlx::query_as::<_, Taxonomy>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_taxonomy(&self, kind: TaxonomyKind, id: i64) -> Result<Option<Taxonomy>> {
        let mut conn = self.pool.acquire().await?;
        find_taxonomy(&mut conn, kind, id).await
    }

    async fn create_taxonomy(&self, kind: TaxonomyKind, name: &str) -> Result<Taxonomy> {
        let sql = format!("INSERT INTO {} (name) VALUES (?)", kind.table());

        let outcome: WriteOutcome = sqlx::query(&sql)
            .bind(name)
            .execute(&self.pool)
            .await?
            .into();

        Ok(Taxonomy {
            id: outcome.generated_id,
            name: name.to_owned(),
        })
    }

    async fn update_taxonomy(&self, kind: TaxonomyKind, id: i64, name: &str) -> Result<Taxonomy> {
        let mut tx = begin_write(&self.pool).await?;

        if find_taxonomy(&mut tx, kind, id).await?.is_none() {
            return Err(Error::NotFound);
        }

        let sql = format!("UPDATE {} SET name = ? WHERE id = ?", kind.table());
        let outcome: WriteOutcome = sqlx::query(&sql)
            .bind(name)
            .bind(id)
            .execute(&mut *tx)
            .await?
            .into();

        if outcome.rows_affected == 0 {
            return Err(Error::NotFound);
        }

        tx.commit().await?;

        Ok(Taxonomy {
            id,
            name: name.to_owned(),
        })
    }

    async fn delete_taxonomy(&self, kind: TaxonomyKind, id: i64) -> Result<()> {
        let mut tx = begin_write(&self.pool).await?;

        if find_taxonomy(&mut tx, kind, id).await?.is_none() {
            return Err(Error::NotFound);
        }

        let unlink = format!(
            "DELETE FROM {} WHERE {} = ?",
            kind.join_table(),
            kind.join_column()
        );
        let unlinked: WriteOutcome = sqlx::query(&unlink)
            .bind(id)
            .execute(&mut *tx)
            .await?
            .into();

        let sql = format!("DELETE FROM {} WHERE id = ?", kind.table());
        let outcome: WriteOutcome = sqlx::query(&sql).bind(id).execute(&mut *tx).await?.into();

        if outcome.rows_affected == 0 {
            return Err(Error::NotFound);
        }

        tx.commit().await?;

        debug!(
            table = kind.table(),
            id,
            associations = unlinked.rows_affected,
            "taxonomy row deleted"
        );
        Ok(())
    }
}

pub(crate) async fn find_taxonomy(
    conn: &mut SqliteConnection,
    kind: TaxonomyKind,
    id: i64,
) -> Result<Option<Taxonomy>> {
    let sql = format!("SELECT id, name FROM {} WHERE id = ?", kind.table());

    let row = sqlx::query_as::<_, Taxonomy>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row)
}

/// Categories or tags linked to a post, ordered by name.
pub(crate) async fn find_for_post(
    conn: &mut SqliteConnection,
    kind: TaxonomyKind,
    post_id: i64,
) -> Result<Vec<Taxonomy>> {
    let sql = format!(
        r#"
        SELECT t.id, t.name
        FROM {table} t
        JOIN {join} j ON t.id = j.{column}
        WHERE j.post_id = ?
        ORDER BY t.name ASC, t.id ASC
        "#,
        table = kind.table(),
        join = kind.join_table(),
        column = kind.join_column(),
    );

    let rows = sqlx::query_as::<_, Taxonomy>(&sql)
        .bind(post_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows)
}

pub(crate) async fn link_to_post(
    conn: &mut SqliteConnection,
    kind: TaxonomyKind,
    post_id: i64,
    ids: &[i64],
) -> Result<()> {
    let sql = format!(
        "INSERT INTO {} (post_id, {}) VALUES (?, ?)",
        kind.join_table(),
        kind.join_column()
    );

    for &id in ids {
        if find_taxonomy(conn, kind, id).await?.is_none() {
            return Err(Error::BadRequest(format!(
                "{} {} does not exist",
                kind.label(),
                id
            )));
        }

        sqlx::query(&sql)
            .bind(post_id)
            .bind(id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

pub(crate) async fn unlink_post(
    conn: &mut SqliteConnection,
    kind: TaxonomyKind,
    post_id: i64,
) -> Result<WriteOutcome> {
    let sql = format!("DELETE FROM {} WHERE post_id = ?", kind.join_table());

    let outcome = sqlx::query(&sql)
        .bind(post_id)
        .execute(&mut *conn)
        .await?
        .into();
    Ok(outcome)
}
