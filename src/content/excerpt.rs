//! Plain-text excerpts for posts without a description

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// Default excerpt length in characters
pub const DEFAULT_EXCERPT_CHARS: usize = 160;

/// Extract a plain-text excerpt from a Markdown/MDX body.
///
/// Stops at `<!-- more -->` when present. Code blocks, raw HTML and MDX
/// component/import lines are skipped. The result is cut at a word boundary
/// and gets an ellipsis when truncated.
pub fn plain_excerpt(body: &str, max_chars: usize) -> String {
    let body = match body.find("<!-- more -->") {
        Some(pos) => &body[..pos],
        None => body,
    };

    let prose: String = body
        .lines()
        .filter(|line| !is_mdx_statement(line))
        .collect::<Vec<_>>()
        .join("\n");

    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_SMART_PUNCTUATION;

    let mut text = String::new();
    let mut in_code_block = false;

    for event in Parser::new_ext(&prose, options) {
        match event {
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => in_code_block = false,
            Event::Text(t) | Event::Code(t) if !in_code_block => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            Event::End(TagEnd::Paragraph) | Event::End(TagEnd::Heading(_)) => text.push(' '),
            _ => {}
        }
    }

    truncate_words(&collapse_whitespace(&text), max_chars)
}

/// `import`/`export` statements and lines that are only a component tag
fn is_mdx_statement(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("import ")
        || trimmed.starts_with("export ")
        || (trimmed.starts_with('<')
            && trimmed
                .chars()
                .nth(1)
                .map(|c| c.is_ascii_uppercase() || c == '/')
                .unwrap_or(false))
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_words(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }

    let cut: String = s.chars().take(max_chars).collect();
    let cut = match cut.rfind(' ') {
        Some(pos) if pos > 0 => &cut[..pos],
        _ => cut.as_str(),
    };
    format!("{}…", cut.trim_end_matches(|c: char| c.is_ascii_punctuation()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_markup() {
        let body = "# Intro\n\nHooks let you **reuse** `state` logic.\n";
        assert_eq!(plain_excerpt(body, 160), "Intro Hooks let you reuse state logic.");
    }

    #[test]
    fn test_skips_code_and_components() {
        let body = r#"import { Chart } from '../components/chart'

<Chart data={points} />

Before the code.

```rust
fn main() {}
```

After the code.
"#;
        assert_eq!(plain_excerpt(body, 160), "Before the code. After the code.");
    }

    #[test]
    fn test_stops_at_more_marker() {
        let body = "Visible part.\n\n<!-- more -->\n\nHidden part.";
        assert_eq!(plain_excerpt(body, 160), "Visible part.");
    }

    #[test]
    fn test_truncates_at_word_boundary() {
        let body = "one two three four five six";
        assert_eq!(plain_excerpt(body, 12), "one two…");
    }
}
