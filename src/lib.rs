use std::sync::Arc;

use config::Config;
use models::taxonomy::TaxonomyKind;
use repositories::SqliteRepo;
use services::{posts::PostsService, taxonomy::TaxonomyService};
use sqlx::SqlitePool;

pub use self::errors::{Error, Result};

pub mod client;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub config: Config,
    pub posts_service: PostsService,
    pub categories_service: TaxonomyService,
    pub tags_service: TaxonomyService,
}

impl AppState {
    pub fn new(db_pool: SqlitePool, config: Config) -> Self {
        let repo = Arc::new(SqliteRepo::new(db_pool.clone()));

        Self {
            db_pool,
            config,
            posts_service: PostsService::new(repo.clone()),
            categories_service: TaxonomyService::new(repo.clone(), TaxonomyKind::Category),
            tags_service: TaxonomyService::new(repo, TaxonomyKind::Tag),
        }
    }

    pub fn taxonomy_service(&self, kind: TaxonomyKind) -> &TaxonomyService {
        match kind {
            TaxonomyKind::Category => &self.categories_service,
            TaxonomyKind::Tag => &self.tags_service,
        }
    }
}
