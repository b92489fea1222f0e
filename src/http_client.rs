//! Default Http Client

use std::time::Duration;

use reqwest::{header::CONTENT_TYPE, Method};

use crate::types::http_client::{
    HttpMethod, HttpRequest, HttpResponse, OidcBlockingHttpClient, OidcHttpClient,
};

const USER_AGENT: &str = concat!("identity-token-client/", env!("CARGO_PKG_VERSION"));

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// The default HttpClient. Implements both [OidcHttpClient] and [OidcBlockingHttpClient].
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultHttpClient;

impl DefaultHttpClient {
    fn method(method: &HttpMethod) -> Method {
        match method {
            HttpMethod::GET => Method::GET,
            HttpMethod::POST => Method::POST,
        }
    }

    fn content_type(headers: &reqwest::header::HeaderMap) -> Option<String> {
        headers
            .get(CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .map(|ct| ct.to_string())
    }

    fn body(body: Result<String, reqwest::Error>) -> Option<String> {
        body.ok().filter(|b| !b.is_empty())
    }
}

impl OidcHttpClient for DefaultHttpClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, String> {
        let client = reqwest::ClientBuilder::new()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| format!("{e}"))?;

        let mut req_builder = client.request(Self::method(&req.method), req.url);

        if let Some(body) = req.body {
            req_builder = req_builder.body(body);
        }

        for (name, values) in req.headers {
            for value in values {
                req_builder = req_builder.header(name.clone(), value);
            }
        }

        req_builder = req_builder.header("User-Agent", USER_AGENT);

        match req_builder.send().await {
            Ok(res) => {
                let status_code = res.status().as_u16();
                let content_type = Self::content_type(res.headers());
                let body = Self::body(res.text().await);

                Ok(HttpResponse {
                    status_code,
                    content_type,
                    body,
                })
            }
            Err(e) => Err(format!("{e}")),
        }
    }
}

impl OidcBlockingHttpClient for DefaultHttpClient {
    fn request(&self, req: HttpRequest) -> Result<HttpResponse, String> {
        let client = reqwest::blocking::ClientBuilder::new()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| format!("{e}"))?;

        let mut req_builder = client.request(Self::method(&req.method), req.url);

        if let Some(body) = req.body {
            req_builder = req_builder.body(body);
        }

        for (name, values) in req.headers {
            for value in values {
                req_builder = req_builder.header(name.clone(), value);
            }
        }

        req_builder = req_builder.header("User-Agent", USER_AGENT);

        match req_builder.send() {
            Ok(res) => {
                let status_code = res.status().as_u16();
                let content_type = Self::content_type(res.headers());
                let body = Self::body(res.text());

                Ok(HttpResponse {
                    status_code,
                    content_type,
                    body,
                })
            }
            Err(e) => Err(format!("{e}")),
        }
    }
}
