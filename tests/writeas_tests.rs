//! Write.as migration against a recording fake

use ghost_migrate::application::WriteAsMigrationService;
use ghost_migrate::error::MigrateError;
use ghost_migrate::infrastructure::config::WriteAsSettings;
use ghost_migrate::infrastructure::PostStore;
use pulldown_cmark::{Event, Parser, Tag};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use walkdir::WalkDir;

mod common;
use common::{load_fixture, RecordingWriteAs, WriteAsCall};

fn settings(output_dir: &Path, delay: Duration) -> WriteAsSettings {
    WriteAsSettings {
        base_url: "https://write.as".to_string(),
        publication: "myblog".to_string(),
        username: "me".to_string(),
        password: "secret".to_string(),
        output_dir: output_dir.to_path_buf(),
        post_delay: delay,
        dry_run: false,
    }
}

fn service(
    api: RecordingWriteAs,
    dir: &Path,
    delay: Duration,
) -> WriteAsMigrationService<RecordingWriteAs> {
    WriteAsMigrationService::new(api, PostStore::new(dir.to_path_buf()), settings(dir, delay))
}

fn markdown_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "md"))
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn test_writes_one_file_per_post() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("posts");
    let service = service(RecordingWriteAs::default(), &out, Duration::ZERO);

    let report = service.execute(&load_fixture()).unwrap();

    assert_eq!(
        markdown_files(&out),
        vec![
            "2019-06-01_about.md",
            "2020-01-01_hi.md",
            "2020-02-03T09:30:00.000Z_links.md",
            "sometime_broken.md",
        ]
    );
    assert_eq!(report.files_written, 4);
    assert_eq!(report.posts_published, 4);
    assert!(report.skipped.is_empty());
}

#[test]
fn test_scenario_file_content() {
    let temp = TempDir::new().unwrap();
    let service = service(RecordingWriteAs::default(), temp.path(), Duration::ZERO);

    service.execute(&load_fixture()).unwrap();

    let content = fs::read_to_string(temp.path().join("2020-01-01_hi.md")).unwrap();
    assert_eq!(content, "# Hi\n\nhey\n\n#tech");
}

#[test]
fn test_feature_image_sits_between_title_and_body() {
    let temp = TempDir::new().unwrap();
    let service = service(RecordingWriteAs::default(), temp.path(), Duration::ZERO);

    service.execute(&load_fixture()).unwrap();

    let content =
        fs::read_to_string(temp.path().join("2020-02-03T09:30:00.000Z_links.md")).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "# Links");
    assert_eq!(lines[1], "");
    assert_eq!(lines[2], "![Feature image](http://x/img.png)");
    assert_eq!(lines[3], "");
    assert!(lines[4].starts_with("Read "));
    assert_eq!(*lines.last().unwrap(), "#rust #tech");
}

#[test]
fn test_published_body_omits_title_and_keeps_links() {
    let temp = TempDir::new().unwrap();
    let service = service(RecordingWriteAs::default(), temp.path(), Duration::ZERO);

    service.execute(&load_fixture()).unwrap();

    let created = service.api().created();
    let links = created.iter().find(|post| post.title == "Links").unwrap();
    assert_eq!(links.created, "2020-02-03T09:30:00.000Z");
    assert!(!links.body.contains("# Links"));

    let mut link_targets = Vec::new();
    let mut image_targets = Vec::new();
    for event in Parser::new(&links.body) {
        match event {
            Event::Start(Tag::Link { dest_url, .. }) => link_targets.push(dest_url.to_string()),
            Event::Start(Tag::Image { dest_url, .. }) => image_targets.push(dest_url.to_string()),
            _ => {}
        }
    }
    assert_eq!(link_targets, vec!["https://example.com/guide"]);
    assert_eq!(image_targets, vec!["http://x/img.png"]);

    let hi = created.iter().find(|post| post.title == "Hi").unwrap();
    assert_eq!(hi.body, "hey\n\n#tech");
    assert_eq!(hi.created, "2020-01-01");
}

#[test]
fn test_session_lifecycle_on_success() {
    let temp = TempDir::new().unwrap();
    let service = service(RecordingWriteAs::default(), temp.path(), Duration::ZERO);

    service.execute(&load_fixture()).unwrap();

    let calls = service.api().calls();
    assert_eq!(calls.first(), Some(&WriteAsCall::Login("me".to_string())));
    assert_eq!(calls.last(), Some(&WriteAsCall::Logout("token-123".to_string())));
    assert_eq!(
        calls
            .iter()
            .filter(|call| matches!(call, WriteAsCall::Logout(_)))
            .count(),
        1
    );
    assert!(calls
        .iter()
        .all(|call| !matches!(call, WriteAsCall::Create(publication, _) if publication != "myblog")));
}

#[test]
fn test_failure_still_logs_out() {
    let temp = TempDir::new().unwrap();
    let api = RecordingWriteAs {
        fail_on_post: Some(1),
        ..Default::default()
    };
    let service = service(api, temp.path(), Duration::ZERO);

    let err = service.execute(&load_fixture()).unwrap_err();

    match &err {
        MigrateError::RemoteCall { status, body, .. } => {
            assert_eq!(*status, Some(429));
            assert!(body.contains("Slow down"));
        }
        other => panic!("Expected RemoteCall, got {:?}", other),
    }

    let calls = service.api().calls();
    assert_eq!(calls.last(), Some(&WriteAsCall::Logout("token-123".to_string())));
    assert_eq!(service.api().created().len(), 1);
    // The file for the failing post was written before publishing
    assert_eq!(markdown_files(temp.path()).len(), 2);
}

#[test]
fn test_login_failure_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("posts");
    let api = RecordingWriteAs {
        fail_login: true,
        ..Default::default()
    };
    let service = service(api, &out, Duration::ZERO);

    let err = service.execute(&load_fixture()).unwrap_err();

    assert_eq!(err.exit_code(), 3);
    assert!(service.api().calls().is_empty());
    assert!(markdown_files(&out).is_empty());
}

#[test]
fn test_delay_between_posts_but_not_after_last() {
    let temp = TempDir::new().unwrap();
    let delay = Duration::from_millis(150);
    let service = service(RecordingWriteAs::default(), temp.path(), delay);

    service.execute(&load_fixture()).unwrap();

    let calls = service.api().calls.borrow();
    let create_times: Vec<_> = calls
        .iter()
        .filter(|(_, call)| matches!(call, WriteAsCall::Create(..)))
        .map(|(at, _)| *at)
        .collect();
    assert_eq!(create_times.len(), 4);
    for pair in create_times.windows(2) {
        assert!(pair[1].duration_since(pair[0]) >= delay);
    }

    let (logout_at, _) = calls.last().unwrap();
    assert!(logout_at.duration_since(*create_times.last().unwrap()) < delay);
}
