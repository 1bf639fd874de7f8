//! Write.as REST client and the authenticated session

use crate::error::{MigrateError, Result};
use reqwest::blocking::{Client, Response};
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://write.as";

/// Payload for creating a post in a publication
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPost {
    pub title: String,
    pub created: String,
    pub body: String,
}

/// Remote operations the Write.as migration needs
pub trait WriteAsApi {
    /// Log in and return an access token
    fn login(&self, alias: &str, password: &str) -> Result<String>;

    /// Publish a post to a publication and return its id
    fn create_post(&self, token: &str, publication: &str, post: &NewPost) -> Result<String>;

    /// Invalidate an access token
    fn logout(&self, token: &str) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct LoginData {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct PostData {
    id: String,
}

#[derive(Serialize)]
struct Credentials<'a> {
    alias: &'a str,
    pass: &'a str,
}

/// `WriteAsApi` over HTTP
pub struct HttpWriteAs {
    base_url: String,
    http: Client,
}

impl HttpWriteAs {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("ghost-migrate/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(HttpWriteAs {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Fail with the response body unless the status is the expected one
fn expect_status(operation: &str, response: Response, expected: StatusCode) -> Result<Response> {
    let status = response.status();
    if status == expected {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(MigrateError::remote(operation, Some(status.as_u16()), body))
}

fn read_data<T: DeserializeOwned>(operation: &str, response: Response) -> Result<T> {
    let body = response.text()?;
    serde_json::from_str::<Envelope<T>>(&body)
        .map(|envelope| envelope.data)
        .map_err(|e| MigrateError::remote(operation, None, format!("{}: {}", e, body)))
}

fn auth_header(token: &str) -> String {
    format!("Token {}", token)
}

impl WriteAsApi for HttpWriteAs {
    fn login(&self, alias: &str, password: &str) -> Result<String> {
        let response = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&Credentials {
                alias,
                pass: password,
            })
            .send()?;

        let response = expect_status("login", response, StatusCode::OK)?;
        let data: LoginData = read_data("login", response)?;
        Ok(data.access_token)
    }

    fn create_post(&self, token: &str, publication: &str, post: &NewPost) -> Result<String> {
        let response = self
            .http
            .post(self.url(&format!("/api/collections/{}/posts", publication)))
            .header(AUTHORIZATION, auth_header(token))
            .json(post)
            .send()?;

        let response = expect_status("create post", response, StatusCode::CREATED)?;
        let data: PostData = read_data("create post", response)?;
        Ok(data.id)
    }

    fn logout(&self, token: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.url("/api/auth/me"))
            .header(AUTHORIZATION, auth_header(token))
            .send()?;

        expect_status("logout", response, StatusCode::NO_CONTENT)?;
        Ok(())
    }
}

/// `WriteAsApi` that publishes nothing, for dry runs
#[derive(Debug, Default)]
pub struct OfflineWriteAs;

impl WriteAsApi for OfflineWriteAs {
    fn login(&self, alias: &str, _password: &str) -> Result<String> {
        tracing::info!("Dry run: skipping login for '{}'", alias);
        Ok(String::from("dry-run"))
    }

    fn create_post(&self, _token: &str, publication: &str, post: &NewPost) -> Result<String> {
        tracing::info!("Dry run: would publish '{}' to '{}'", post.title, publication);
        Ok(String::from("dry-run"))
    }

    fn logout(&self, _token: &str) -> Result<()> {
        Ok(())
    }
}

/// An authenticated Write.as session.
///
/// The token is released on `close`, or on drop when the run ends early.
pub struct WriteAsSession<'a, A: WriteAsApi> {
    api: &'a A,
    token: Option<String>,
}

impl<'a, A: WriteAsApi> WriteAsSession<'a, A> {
    pub fn open(api: &'a A, alias: &str, password: &str) -> Result<Self> {
        let token = api.login(alias, password)?;
        tracing::info!("Authenticated with Write.as as '{}'", alias);
        Ok(WriteAsSession {
            api,
            token: Some(token),
        })
    }

    pub fn publish(&self, publication: &str, post: &NewPost) -> Result<String> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| MigrateError::remote("create post", None, "session already closed"))?;
        self.api.create_post(token, publication, post)
    }

    /// Log out, reporting failure to the caller
    pub fn close(mut self) -> Result<()> {
        match self.token.take() {
            Some(token) => {
                self.api.logout(&token)?;
                tracing::info!("Logged out of Write.as");
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl<A: WriteAsApi> Drop for WriteAsSession<'_, A> {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            match self.api.logout(&token) {
                Ok(()) => tracing::info!("Logged out of Write.as"),
                Err(e) => tracing::warn!("Write.as logout failed: {}", e),
            }
        }
    }
}
