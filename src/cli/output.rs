//! Output formatting utilities

use crate::application::{MigrationReport, PostSummary};
use crate::domain::tags::hashtag_line;

/// Format export summaries, one post per line
pub fn format_post_list(posts: &[PostSummary]) -> String {
    if posts.is_empty() {
        return "No posts found".to_string();
    }

    let mut output = String::new();
    for post in posts {
        let kind = if post.is_page { "page" } else { "post" };
        output.push_str(&format!(
            "{}  {}  {}  {}",
            kind, post.effective_date, post.slug, post.title
        ));
        if !post.tags.is_empty() {
            output.push_str("  ");
            output.push_str(&hashtag_line(&post.tags));
        }
        output.push('\n');
    }
    output
}

/// Format the closing summary of a migration run
pub fn format_report(report: &MigrationReport) -> String {
    let mut output = String::new();

    if report.tags_created > 0 || report.tags_reused > 0 {
        output.push_str(&format!(
            "Tags: {} created, {} reused\n",
            report.tags_created, report.tags_reused
        ));
    }
    if report.files_written > 0 {
        output.push_str(&format!("Files written: {}\n", report.files_written));
    }
    output.push_str(&format!("Posts published: {}\n", report.posts_published));
    if report.pages_published > 0 {
        output.push_str(&format!("Pages published: {}\n", report.pages_published));
    }
    if !report.skipped.is_empty() {
        output.push_str(&format!("Skipped: {}\n", report.skipped.len()));
        for skipped in &report.skipped {
            output.push_str(&format!("  {} ({})\n", skipped.title, skipped.reason));
        }
    }

    output
}
