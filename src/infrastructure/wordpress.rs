//! WordPress XML-RPC client

use crate::domain::wordpress::{PUBLISH_STATUS, TAG_TAXONOMY};
use crate::domain::{WordPressEntry, WordPressTerm};
use crate::error::{MigrateError, Result};
use crate::infrastructure::xmlrpc::{method_call, parse_response, MethodResponse, XmlRpcValue};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;

/// Remote operations the WordPress migration needs
pub trait WordPressApi {
    /// Create a taxonomy term and return its id
    fn new_term(&self, term: &WordPressTerm) -> Result<String>;

    /// Create a post or page and return its id
    fn new_post(&self, entry: &WordPressEntry) -> Result<String>;

    /// List existing terms of a taxonomy
    fn existing_terms(&self, taxonomy: &str) -> Result<Vec<WordPressTerm>>;
}

/// Credentials and target blog for an XML-RPC endpoint
#[derive(Debug, Clone)]
pub struct WordPressOptions {
    pub endpoint: String,
    pub username: String,
    pub password: String,
    pub blog_id: i64,
}

/// `WordPressApi` over HTTP
pub struct XmlRpcClient {
    options: WordPressOptions,
    http: Client,
}

impl XmlRpcClient {
    pub fn new(options: WordPressOptions) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("ghost-migrate/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(XmlRpcClient { options, http })
    }

    /// Perform an authenticated `wp.*` call: blog id, username, and password lead the params
    fn call(&self, method: &str, extra: Vec<XmlRpcValue>) -> Result<XmlRpcValue> {
        let mut params = vec![
            XmlRpcValue::Int(self.options.blog_id),
            XmlRpcValue::string(&self.options.username),
            XmlRpcValue::string(&self.options.password),
        ];
        params.extend(extra);

        tracing::debug!("XML-RPC {} -> {}", method, self.options.endpoint);
        let response = self
            .http
            .post(&self.options.endpoint)
            .header(CONTENT_TYPE, "text/xml")
            .body(method_call(method, &params))
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(MigrateError::remote(method, Some(status.as_u16()), body));
        }

        match parse_response(&body) {
            Ok(MethodResponse::Success(value)) => Ok(value),
            Ok(MethodResponse::Fault { code, message }) => Err(MigrateError::remote(
                method,
                None,
                format!("fault {}: {}", code, message),
            )),
            Err(e) => Err(MigrateError::remote(
                method,
                Some(status.as_u16()),
                format!("invalid XML-RPC response ({}): {}", e, body),
            )),
        }
    }
}

impl WordPressApi for XmlRpcClient {
    fn new_term(&self, term: &WordPressTerm) -> Result<String> {
        let id = self.call("wp.newTerm", vec![term_struct(term)])?;
        Ok(id.to_display_string())
    }

    fn new_post(&self, entry: &WordPressEntry) -> Result<String> {
        let id = self.call("wp.newPost", vec![entry_struct(entry)])?;
        Ok(id.to_display_string())
    }

    fn existing_terms(&self, taxonomy: &str) -> Result<Vec<WordPressTerm>> {
        let value = self.call("wp.getTerms", vec![XmlRpcValue::string(taxonomy)])?;
        let items = value.as_array().ok_or_else(|| {
            MigrateError::remote("wp.getTerms", None, "expected an array of terms")
        })?;

        Ok(items
            .iter()
            .filter_map(|item| {
                let name = item.member("name")?.as_str()?.to_string();
                let slug = item
                    .member("slug")
                    .and_then(XmlRpcValue::as_str)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string);
                Some(WordPressTerm { name, slug })
            })
            .collect())
    }
}

/// `wp.newTerm` content struct
pub fn term_struct(term: &WordPressTerm) -> XmlRpcValue {
    let mut members = vec![
        ("taxonomy", XmlRpcValue::string(TAG_TAXONOMY)),
        ("name", XmlRpcValue::string(&term.name)),
    ];
    if let Some(slug) = &term.slug {
        members.push(("slug", XmlRpcValue::string(slug)));
    }
    XmlRpcValue::structure(members)
}

/// `wp.newPost` content struct
pub fn entry_struct(entry: &WordPressEntry) -> XmlRpcValue {
    match entry {
        WordPressEntry::Post {
            title,
            slug,
            content,
            date,
            tags,
        } => XmlRpcValue::structure([
            ("post_type", XmlRpcValue::string(entry.post_type())),
            ("post_status", XmlRpcValue::string(PUBLISH_STATUS)),
            ("post_title", XmlRpcValue::string(title)),
            ("post_content", XmlRpcValue::string(content)),
            ("post_name", XmlRpcValue::string(slug)),
            ("post_date", XmlRpcValue::DateTime(*date)),
            (
                "terms_names",
                XmlRpcValue::structure([(
                    TAG_TAXONOMY,
                    XmlRpcValue::Array(tags.iter().map(XmlRpcValue::string).collect()),
                )]),
            ),
        ]),
        WordPressEntry::Page { title, content } => XmlRpcValue::structure([
            ("post_type", XmlRpcValue::string(entry.post_type())),
            ("post_status", XmlRpcValue::string(PUBLISH_STATUS)),
            ("post_title", XmlRpcValue::string(title)),
            ("post_content", XmlRpcValue::string(content)),
        ]),
    }
}
