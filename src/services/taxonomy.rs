use std::sync::Arc;

use tracing::info;
use validator::Validate;

use crate::{
    models::taxonomy::{Taxonomy, TaxonomyDto, TaxonomyKind},
    repositories::taxonomy_repo::TaxonomyRepository,
    Error, Result,
};

/// CRUD over one taxonomy table; one instance serves categories, another tags.
#[derive(Clone)]
pub struct TaxonomyService {
    repo: Arc<dyn TaxonomyRepository>,
    kind: TaxonomyKind,
}

impl TaxonomyService {
    pub fn new(repo: Arc<dyn TaxonomyRepository>, kind: TaxonomyKind) -> Self {
        Self { repo, kind }
    }

    pub async fn list(&self) -> Result<Vec<Taxonomy>> {
        self.repo.list_taxonomies(self.kind).await
    }

    pub async fn get(&self, id: i64) -> Result<Taxonomy> {
        self.repo
            .get_taxonomy(self.kind, id)
            .await?
            .ok_or(Error::NotFound)
    }

    pub async fn create(&self, dto: TaxonomyDto) -> Result<Taxonomy> {
        dto.validate()?;

        let created = self.repo.create_taxonomy(self.kind, &dto.name).await?;
        info!(table = self.kind.table(), id = created.id, "taxonomy created");
        Ok(created)
    }

    pub async fn update(&self, id: i64, dto: TaxonomyDto) -> Result<Taxonomy> {
        dto.validate()?;

        self.repo.update_taxonomy(self.kind, id, &dto.name).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.repo.delete_taxonomy(self.kind, id).await?;
        info!(table = self.kind.table(), id, "taxonomy deleted");
        Ok(())
    }
}
