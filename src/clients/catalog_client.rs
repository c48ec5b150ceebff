use async_trait::async_trait;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::HeaderValue;
use log::{info, warn};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_derive::Deserialize;

use crate::models::catalog::{BookDetail, Page};
use crate::models::errors::FetchError;
use crate::models::member::{Borrowings, LoginRequest, LoginResult, Profile, ProfileUpdate, Session, UpdateResult};
use crate::pagination::{BookSource, PageRequest};

/// Catalog API response plus the cookies it wants the browser to store.
#[derive(Debug)]
pub struct WithCookies<T> {
    pub body: T,
    pub set_cookies: Vec<HeaderValue>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

pub struct CatalogClient {
    client: reqwest::Client,
    base_uri: String,
}

impl CatalogClient {
    pub fn new(client: reqwest::Client, base_uri: String) -> Self {
        let base_uri = base_uri.trim_end_matches('/').to_string();
        Self { client, base_uri }
    }

    pub async fn list_books(&self, offset: u32, limit: u32, cookie: Option<&str>) -> Result<Page, FetchError> {
        let request = self.client.get(format!("{}/books/", self.base_uri))
            .query(&[("limit", limit), ("offset", offset)]);
        self.send_json(request, cookie).await.map(|response| response.body)
    }

    pub async fn search_books(
        &self,
        query: &str,
        offset: u32,
        limit: u32,
        cookie: Option<&str>,
    ) -> Result<Page, FetchError> {
        let request = self.client.get(format!("{}/books/search/", self.base_uri))
            .query(&[("q", query)])
            .query(&[("limit", limit), ("offset", offset)]);
        self.send_json(request, cookie).await.map(|response| response.body)
    }

    pub async fn get_book(&self, isbn: &str, cookie: Option<&str>) -> Result<BookDetail, FetchError> {
        let request = self.client.get(format!("{}/books/{}/", self.base_uri, urlencoding::encode(isbn)));
        self.send_json(request, cookie).await.map(|response| response.body)
    }

    pub async fn session(&self, cookie: Option<&str>) -> Result<Session, FetchError> {
        let request = self.client.get(format!("{}/auth/session/", self.base_uri));
        self.send_json(request, cookie).await.map(|response| response.body)
    }

    pub async fn login(
        &self,
        credentials: &LoginRequest,
        cookie: Option<&str>,
    ) -> Result<WithCookies<LoginResult>, FetchError> {
        let request = self.client.post(format!("{}/auth/login/", self.base_uri))
            .json(credentials);
        self.send_json(request, cookie).await
    }

    pub async fn logout(&self, cookie: Option<&str>) -> Result<Vec<HeaderValue>, FetchError> {
        let request = self.client.post(format!("{}/auth/logout/", self.base_uri));
        self.send_json::<serde_json::Value>(request, cookie).await
            .map(|response| response.set_cookies)
    }

    pub async fn profile(&self, cookie: Option<&str>) -> Result<Profile, FetchError> {
        let request = self.client.get(format!("{}/member/profile/", self.base_uri));
        self.send_json(request, cookie).await.map(|response| response.body)
    }

    pub async fn update_profile(
        &self,
        update: &ProfileUpdate,
        cookie: Option<&str>,
    ) -> Result<UpdateResult, FetchError> {
        let request = self.client.post(format!("{}/member/profile/update/", self.base_uri))
            .json(update);
        self.send_json(request, cookie).await.map(|response| response.body)
    }

    pub async fn borrowings(&self, cookie: Option<&str>) -> Result<Borrowings, FetchError> {
        let request = self.client.get(format!("{}/member/borrowings/", self.base_uri));
        self.send_json(request, cookie).await.map(|response| response.body)
    }

    pub fn authorized<'a>(&'a self, cookie: Option<&'a str>) -> AuthorizedCatalog<'a> {
        AuthorizedCatalog { client: self, cookie }
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        cookie: Option<&str>,
    ) -> Result<WithCookies<T>, FetchError> {
        let request = match cookie {
            Some(cookie) => request.header(COOKIE, cookie),
            None => request,
        };
        let request = request.build().map_err(FetchError::from_reqwest)?;
        let method = request.method().clone();

        let result = self.client.execute(request).await
            .map_err(|err| {
                warn!("{} failed: {}", method, err);
                FetchError::from_reqwest(err)
            })?;

        info!("{} {} {}", method, result.url(), result.status());
        let status = result.status();
        if !status.is_success() {
            let message = result.json::<ErrorBody>().await
                .ok()
                .and_then(|body| body.error);
            return Err(FetchError::HttpError { status: status.as_u16(), message });
        }

        let set_cookies = result.headers().get_all(SET_COOKIE).iter().cloned().collect();
        let body = result.json::<T>().await
            .map_err(FetchError::from_reqwest)?;

        Ok(WithCookies { body, set_cookies })
    }
}

pub struct AuthorizedCatalog<'a> {
    client: &'a CatalogClient,
    cookie: Option<&'a str>,
}

#[async_trait]
impl BookSource for AuthorizedCatalog<'_> {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page, FetchError> {
        match &request.query {
            Some(query) => self.client.search_books(query, request.offset, request.limit, self.cookie).await,
            None => self.client.list_books(request.offset, request.limit, self.cookie).await,
        }
    }
}
