//! Typed HTTP client for the `/api` surface, one method per endpoint.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::models::{
    posts::{CreatePostDto, PostDetail, PostSummary, UpdatePostDto},
    response::{DataResponse, ErrorResponse, MessageResponse},
    taxonomy::{Taxonomy, TaxonomyDto, TaxonomyKind},
};

#[derive(Debug)]
pub enum ClientError {
    Http(reqwest::Error),
    Api { status: StatusCode, message: String },
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http(err) => err.status(),
            Self::Api { status, .. } => Some(*status),
        }
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(err) => write!(f, "request failed: {err}"),
            Self::Api { status, message } => write!(f, "{status}: {message}"),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err)
    }
}

pub type ClientResult<T> = core::result::Result<T, ClientError>;

#[derive(Debug, Clone)]
pub struct BlogClient {
    http: Client,
    base_url: String,
}

impl BlogClient {
    /// `base_url` is the API root, e.g. `http://localhost:9000/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get_posts(&self) -> ClientResult<Vec<PostSummary>> {
        send(self.http.get(self.url("/posts"))).await
    }

    pub async fn get_post(&self, id: i64) -> ClientResult<PostDetail> {
        send(self.http.get(self.url(&format!("/posts/{id}")))).await
    }

    pub async fn create_post(&self, post: &CreatePostDto) -> ClientResult<PostDetail> {
        send(self.http.post(self.url("/posts")).json(post)).await
    }

    pub async fn update_post(&self, id: i64, post: &UpdatePostDto) -> ClientResult<PostDetail> {
        send(self.http.put(self.url(&format!("/posts/{id}"))).json(post)).await
    }

    pub async fn delete_post(&self, id: i64) -> ClientResult<()> {
        check(self.http.delete(self.url(&format!("/posts/{id}"))).send().await?).await?;
        Ok(())
    }

    pub async fn get_categories(&self) -> ClientResult<Vec<Taxonomy>> {
        self.list_taxonomies(TaxonomyKind::Category).await
    }

    pub async fn get_category(&self, id: i64) -> ClientResult<Taxonomy> {
        self.get_taxonomy(TaxonomyKind::Category, id).await
    }

    pub async fn create_category(&self, name: &str) -> ClientResult<Taxonomy> {
        self.create_taxonomy(TaxonomyKind::Category, name).await
    }

    pub async fn update_category(&self, id: i64, name: &str) -> ClientResult<Taxonomy> {
        self.update_taxonomy(TaxonomyKind::Category, id, name).await
    }

    pub async fn delete_category(&self, id: i64) -> ClientResult<String> {
        self.delete_taxonomy(TaxonomyKind::Category, id).await
    }

    pub async fn get_tags(&self) -> ClientResult<Vec<Taxonomy>> {
        self.list_taxonomies(TaxonomyKind::Tag).await
    }

    pub async fn get_tag(&self, id: i64) -> ClientResult<Taxonomy> {
        self.get_taxonomy(TaxonomyKind::Tag, id).await
    }

    pub async fn create_tag(&self, name: &str) -> ClientResult<Taxonomy> {
        self.create_taxonomy(TaxonomyKind::Tag, name).await
    }

    pub async fn update_tag(&self, id: i64, name: &str) -> ClientResult<Taxonomy> {
        self.update_taxonomy(TaxonomyKind::Tag, id, name).await
    }

    pub async fn delete_tag(&self, id: i64) -> ClientResult<String> {
        self.delete_taxonomy(TaxonomyKind::Tag, id).await
    }

    async fn list_taxonomies(&self, kind: TaxonomyKind) -> ClientResult<Vec<Taxonomy>> {
        let url = self.url(&format!("/{}", kind.table()));
        let body: DataResponse<Vec<Taxonomy>> = send(self.http.get(url)).await?;
        Ok(body.data)
    }

    async fn get_taxonomy(&self, kind: TaxonomyKind, id: i64) -> ClientResult<Taxonomy> {
        let url = self.url(&format!("/{}/{id}", kind.table()));
        let body: DataResponse<Taxonomy> = send(self.http.get(url)).await?;
        Ok(body.data)
    }

    async fn create_taxonomy(&self, kind: TaxonomyKind, name: &str) -> ClientResult<Taxonomy> {
        let url = self.url(&format!("/{}", kind.table()));
        let dto = TaxonomyDto {
            name: name.to_string(),
        };
        let body: DataResponse<Taxonomy> = send(self.http.post(url).json(&dto)).await?;
        Ok(body.data)
    }

    async fn update_taxonomy(
        &self,
        kind: TaxonomyKind,
        id: i64,
        name: &str,
    ) -> ClientResult<Taxonomy> {
        let url = self.url(&format!("/{}/{id}", kind.table()));
        let dto = TaxonomyDto {
            name: name.to_string(),
        };
        let body: DataResponse<Taxonomy> = send(self.http.put(url).json(&dto)).await?;
        Ok(body.data)
    }

    async fn delete_taxonomy(&self, kind: TaxonomyKind, id: i64) -> ClientResult<String> {
        let url = self.url(&format!("/{}/{id}", kind.table()));
        let body: MessageResponse = send(self.http.delete(url)).await?;
        Ok(body.message)
    }
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> ClientResult<T> {
    let response = check(request.send().await?).await?;
    Ok(response.json::<T>().await?)
}

async fn check(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<ErrorResponse>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };
    Err(ClientError::Api { status, message })
}
