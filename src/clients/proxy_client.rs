use axum::http::{HeaderMap, HeaderValue, Request};
use axum::response::Response;
use hyper::Body;
use log::info;
use once_cell::sync::Lazy;
use unicase::Ascii;

use crate::models::errors::ProxyError;

pub const API_PREFIX: &str = "/api";

#[derive(Clone)]
pub struct ProxyClient {
    client: reqwest::Client,
    api_url: String,
}

impl ProxyClient {
    pub fn new(client: reqwest::Client, api_url: String) -> Self {
        let api_url = api_url.trim_end_matches('/').to_string();
        Self { client, api_url }
    }

    pub async fn proxy_request(
        &self,
        req: Request<Body>,
    ) -> Result<Response<Body>, ProxyError> {
        let request = self.to_proxy_request(req)?;
        let method = request.method().clone();
        let response = self.call_proxy_request(request).await?;
        info!("proxy {} {} {}", method, response.url(), response.status());

        self.response_to_reply(response).await
    }

    async fn response_to_reply(
        &self,
        response: reqwest::Response,
    ) -> Result<Response<Body>, ProxyError> {
        let mut builder = Response::builder();
        for (k, v) in forwarded_headers(response.headers()).iter() {
            builder = builder.header(k, v);
        }
        let status = response.status();
        let body = Body::wrap_stream(response.bytes_stream());
        builder
            .status(status)
            .body(body)
            .map_err(|err| ProxyError { message: err.to_string() })
    }

    pub fn upstream_url(&self, path_and_query: &str) -> String {
        let rest = path_and_query.strip_prefix(API_PREFIX).unwrap_or(path_and_query);
        format!("{}{}", self.api_url, rest)
    }

    fn to_proxy_request(
        &self,
        request: Request<Body>,
    ) -> Result<reqwest::Request, ProxyError> {
        let url = match request.uri().path_and_query() {
            Some(path) => self.upstream_url(path.as_str()),
            None => self.upstream_url(request.uri().path()),
        };

        let headers = forwarded_headers(request.headers());

        self.client
            .request(request.method().clone(), url)
            .headers(headers)
            .body(request.into_body())
            .build()
            .map_err(|err| ProxyError { message: err.to_string() })
    }

    async fn call_proxy_request(&self, request: reqwest::Request) -> Result<reqwest::Response, ProxyError> {
        self.client
            .execute(request)
            .await
            .map_err(|err| ProxyError { message: err.to_string() })
    }
}

/// Connection-scoped headers, plus `Host`, which must name the catalog and not the portal.
static NOT_FORWARDED: Lazy<Vec<Ascii<&'static str>>> = Lazy::new(|| {
    [
        "Connection",
        "Host",
        "Keep-Alive",
        "Proxy-Authenticate",
        "Proxy-Authorization",
        "Te",
        "Trailers",
        "Transfer-Encoding",
        "Upgrade",
    ].into_iter().map(Ascii::new).collect()
});

fn is_forwarded(header_name: &str) -> bool {
    !NOT_FORWARDED.iter().any(|name| name == &header_name)
}

fn forwarded_headers(headers: &HeaderMap<HeaderValue>) -> HeaderMap<HeaderValue> {
    headers.iter()
        .filter(|(name, _)| is_forwarded(name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}
