//! # Http Client Interface for Custom Http Clients

use std::collections::HashMap;

use url::Url;

use crate::helpers::string_map_to_form_url_encoded;

use super::OidcReturnType;

/// The Http methods the token client issues
#[derive(Debug, Default, Clone, PartialEq)]
pub enum HttpMethod {
    /// The GET method is used to retrieve data from a server.
    #[default]
    GET,
    /// The POST method is used to submit data to a server.
    POST,
}

/// # Request
/// A token endpoint request, ready to be handed to a transport.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Url of the request
    pub url: Url,
    /// Http method of the request
    pub method: HttpMethod,
    /// Headers that are sent in the request
    pub headers: HashMap<String, Vec<String>>,
    /// Form fields of the request body. The encoded `body` is derived from it.
    pub form: HashMap<String, String>,
    /// The request body to be sent
    pub body: Option<String>,
}

impl HttpRequest {
    pub(crate) fn new(url: Url) -> Self {
        Self {
            url,
            headers: HashMap::new(),
            method: HttpMethod::GET,
            form: HashMap::new(),
            body: None,
        }
    }

    pub(crate) fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    pub(crate) fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();

        if let Some(values) = self.headers.get_mut(&name) {
            values.push(value);
        } else {
            self.headers.insert(name, vec![value]);
        }
        self
    }

    pub(crate) fn form(mut self, form: HashMap<String, String>) -> Self {
        let form_body = string_map_to_form_url_encoded(&form);
        self.headers.insert(
            "content-type".to_string(),
            vec!["application/x-www-form-urlencoded".to_string()],
        );
        self.form = form;
        self.body(form_body)
    }

    pub(crate) fn body(mut self, body: String) -> Self {
        self.headers.insert(
            "content-length".to_string(),
            vec![body.as_bytes().len().to_string()],
        );
        self.body = Some(body);
        self
    }

    /// Value of a form field
    pub fn form_value(&self, key: &str) -> Option<&str> {
        self.form.get(key).map(String::as_str)
    }
}

/// Represents an HTTP response received from a server.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// The HTTP status code of the response (e.g., 200 for success, 400 for Bad Request).
    pub status_code: u16,
    /// The content type header
    pub content_type: Option<String>,
    /// The optional body content of the response. None if there is no body content (String).
    pub body: Option<String>,
}

/// This trait defines the interface for sending token requests without blocking.
/// Users who need custom HTTP clients need to implement this trait.
pub trait OidcHttpClient {
    /// Sends the request and resolves to the raw response.
    ///
    ///  * On success, the result is `Ok(HttpResponse)` whatever the status code is.
    ///  * On error, the result is `Err(String)` with an error message describing the failure.
    ///
    /// Timeouts, retries and redirects are the transport's business.
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse, String>> + Send;
}

/// Blocking counterpart of [OidcHttpClient]
pub trait OidcBlockingHttpClient {
    /// Sends the request and returns the raw response.
    fn request(&self, req: HttpRequest) -> Result<HttpResponse, String>;
}

pub(crate) fn map_transport<T>(result: Result<T, String>) -> OidcReturnType<T> {
    result.map_err(|e| {
        Box::new(super::OidcClientError::new_error(
            &format!("token request failed: {e}"),
            None,
        ))
    })
}
