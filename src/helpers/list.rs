//! Text rendering for feed views and search results

use std::fmt::Write;

use crate::content::Post;
use crate::feed::{EntryView, FeedView};
use crate::search::Match;

/// Render a feed view as plain text, one block per entry
pub fn feed_text(view: &FeedView) -> String {
    let mut out = String::new();

    if !view.state.query.trim().is_empty() {
        let _ = writeln!(out, "Search: {}", view.state.query);
        out.push('\n');
    }

    for entry in &view.entries {
        out.push_str(&entry_text(entry));
        out.push('\n');
    }

    if let Some(line) = view.status_line() {
        out.push_str(&line);
        out.push('\n');
    }

    out
}

/// Render a single entry
pub fn entry_text(entry: &EntryView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  {}", entry.date, entry.title);
    if !entry.description.is_empty() {
        let _ = writeln!(out, "    {}", entry.description);
    }
    if !entry.tags.is_empty() {
        let tags: Vec<String> = entry.tags.iter().map(|t| format!("#{}", t)).collect();
        let _ = writeln!(out, "    {}", tags.join(" "));
    }
    if let Some(image) = &entry.image {
        let _ = writeln!(out, "    [image: {}]", image);
    }
    let _ = writeln!(out, "    /{}", entry.path.trim_start_matches('/'));
    out
}

/// Render ranked search results with their quality and matching fields
pub fn matches_text(posts: &[Post], matches: &[Match], limit: usize) -> String {
    if matches.is_empty() {
        return "No matches.\n".to_string();
    }

    let mut out = String::new();
    for (rank, m) in matches.iter().take(limit).enumerate() {
        let post = &posts[m.index];
        let fields: Vec<String> = m
            .hits
            .iter()
            .map(|h| format!("{} {:.2}", h.field.as_str(), h.score))
            .collect();
        let _ = writeln!(
            out,
            "{:>3}. {:.3}  {} [{}]",
            rank + 1,
            m.quality(),
            post.title,
            fields.join(", ")
        );
    }

    if matches.len() > limit {
        let _ = writeln!(out, "… and {} more", matches.len() - limit);
    }
    out
}
