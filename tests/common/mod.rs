#![allow(dead_code)]

use assert_cmd::Command;
use ghost_migrate::domain::{GhostExport, WordPressEntry, WordPressTerm};
use ghost_migrate::error::{MigrateError, Result};
use ghost_migrate::infrastructure::{NewPost, WordPressApi, WriteAsApi};
use std::cell::RefCell;
use std::fs;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use std::time::Instant;

pub fn ghost_migrate_cmd() -> Command {
    let mut cmd = Command::cargo_bin("ghost-migrate").unwrap();
    cmd.env_remove("GHOST_MIGRATE_CONFIG");
    cmd.env_remove("GHOST_MIGRATE_PASSWORD");
    cmd.env_remove("RUST_LOG");
    cmd
}

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn load_fixture() -> GhostExport {
    let contents = fs::read_to_string(fixture_path("ghost_export.json")).unwrap();
    GhostExport::from_json(&contents).unwrap()
}

/// In-memory WordPress that records every call
#[derive(Default)]
pub struct RecordingWordPress {
    pub existing: Vec<WordPressTerm>,
    pub terms: RefCell<Vec<WordPressTerm>>,
    pub entries: RefCell<Vec<WordPressEntry>>,
    pub fail_on_post: Option<usize>,
}

impl WordPressApi for RecordingWordPress {
    fn new_term(&self, term: &WordPressTerm) -> Result<String> {
        let mut terms = self.terms.borrow_mut();
        terms.push(term.clone());
        Ok(terms.len().to_string())
    }

    fn new_post(&self, entry: &WordPressEntry) -> Result<String> {
        let mut entries = self.entries.borrow_mut();
        if self.fail_on_post == Some(entries.len()) {
            return Err(MigrateError::remote(
                "wp.newPost",
                None,
                "fault 500: Sorry, you are not allowed to publish posts",
            ));
        }
        entries.push(entry.clone());
        Ok((100 + entries.len()).to_string())
    }

    fn existing_terms(&self, _taxonomy: &str) -> Result<Vec<WordPressTerm>> {
        Ok(self.existing.clone())
    }
}

/// One observed Write.as call
#[derive(Debug, Clone, PartialEq)]
pub enum WriteAsCall {
    Login(String),
    Create(String, NewPost),
    Logout(String),
}

/// In-memory Write.as that records every call with its time
#[derive(Default)]
pub struct RecordingWriteAs {
    pub calls: RefCell<Vec<(Instant, WriteAsCall)>>,
    pub fail_login: bool,
    pub fail_on_post: Option<usize>,
}

impl RecordingWriteAs {
    pub fn calls(&self) -> Vec<WriteAsCall> {
        self.calls.borrow().iter().map(|(_, c)| c.clone()).collect()
    }

    pub fn created(&self) -> Vec<NewPost> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                WriteAsCall::Create(_, post) => Some(post),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: WriteAsCall) {
        self.calls.borrow_mut().push((Instant::now(), call));
    }
}

impl WriteAsApi for RecordingWriteAs {
    fn login(&self, alias: &str, _password: &str) -> Result<String> {
        if self.fail_login {
            return Err(MigrateError::remote(
                "login",
                Some(401),
                r#"{"code":401,"error_msg":"Incorrect password."}"#,
            ));
        }
        self.record(WriteAsCall::Login(alias.to_string()));
        Ok("token-123".to_string())
    }

    fn create_post(&self, _token: &str, publication: &str, post: &NewPost) -> Result<String> {
        if self.fail_on_post == Some(self.created().len()) {
            return Err(MigrateError::remote(
                "create post",
                Some(429),
                r#"{"code":429,"error_msg":"Slow down."}"#,
            ));
        }
        self.record(WriteAsCall::Create(publication.to_string(), post.clone()));
        Ok(format!("post{}", self.created().len()))
    }

    fn logout(&self, token: &str) -> Result<()> {
        self.record(WriteAsCall::Logout(token.to_string()));
        Ok(())
    }
}

/// HTTP server on a local port that answers each connection with the next
/// canned `(status, body)` response and keeps the raw requests
pub struct StubServer {
    pub url: String,
    handle: JoinHandle<Vec<String>>,
}

impl StubServer {
    pub fn start(responses: Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let mut requests = Vec::new();
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().unwrap();
                requests.push(read_request(&mut stream));
                let response = format!(
                    "HTTP/1.1 {} Stub\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                stream.write_all(response.as_bytes()).unwrap();
            }
            requests
        });

        StubServer { url, handle }
    }

    /// Wait until every response was served and return the requests
    pub fn requests(self) -> Vec<String> {
        self.handle.join().unwrap()
    }
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let read = stream.read(&mut buf).unwrap();
        if read == 0 {
            break;
        }
        data.extend_from_slice(&buf[..read]);

        if let Some(end) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&data[..end]).to_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if data.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&data).into_owned()
}
