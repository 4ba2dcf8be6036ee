use crate::errors::Result;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Blocking client for the Atlassian REST API. Every request carries the
/// Basic-Auth pair; the cookie store keeps the session the wiki endpoints
/// hand out after the first call.
pub struct AtlassianClient {
    http: Client,
    user_email: String,
    api_token: String,
}

impl AtlassianClient {
    pub fn new(user_email: &str, api_token: &str) -> Result<AtlassianClient> {
        // archives can take minutes to stream, so no overall request timeout
        let http = Client::builder()
            .cookie_store(true)
            .timeout(None)
            .build()?;

        Ok(AtlassianClient {
            http,
            user_email: user_email.to_string(),
            api_token: api_token.to_string(),
        })
    }

    fn headers() -> HeaderMap {
        vec![
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            ),
            (header::ACCEPT, HeaderValue::from_static("application/json")),
        ]
        .into_iter()
        .collect()
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.basic_auth(&self.user_email, Some(&self.api_token))
    }

    pub fn post_json<T: Serialize + ?Sized>(&self, url: &str, body: &T) -> Result<Response> {
        let req = self
            .authed(self.http.post(url))
            .headers(Self::headers())
            .body(serde_json::to_string(body)?);

        Ok(req.send()?)
    }

    /// Plain authenticated GET; the body is left unread for streaming.
    pub fn get(&self, url: &str) -> Result<Response> {
        Ok(self.authed(self.http.get(url)).send()?)
    }

    /// Authenticated GET whose body must parse as JSON, whatever the status.
    pub fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let res = self
            .authed(self.http.get(url))
            .headers(Self::headers())
            .send()?;
        let text = res.text()?;

        Ok(serde_json::from_str(&text)?)
    }
}
