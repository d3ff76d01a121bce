//! Interactive feed in the terminal
//!
//! An empty line scrolls to the bottom of the list (the sentinel becomes
//! visible), `/text` searches, `/` clears the search and `q` quits.

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::feed::{FeedSession, FeedView, ManualSentinel};
use crate::helpers::feed_text;
use crate::Folio;

const HELP: &str = "Enter: load more   /text: search   /: clear search   q: quit";

/// A line typed by the user
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Scroll,
    Query(String),
    Quit,
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    match line {
        "" => Input::Scroll,
        "q" | ":q" | "quit" => Input::Quit,
        _ => Input::Query(line.strip_prefix('/').unwrap_or(line).trim().to_string()),
    }
}

/// Run the interactive session until the user quits or stdin closes
pub async fn run(folio: &Folio, query: Option<&str>) -> Result<()> {
    let posts = folio.load_posts()?;
    let sentinel = ManualSentinel::new();
    let session = FeedSession::mount(folio.controller(posts), sentinel.clone());
    if let Some(query) = query {
        session.set_query(query);
    }

    let mut views = session.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}\n", HELP);
    let mut last = views.borrow_and_update().clone();
    print_view(&last);

    loop {
        tokio::select! {
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = views.borrow_and_update().clone();
                if view != last {
                    print_view(&view);
                    last = view;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_input(&line) {
                    Input::Scroll => {
                        if !last.has_sentinel() {
                            tracing::debug!("Nothing more to load");
                        }
                        sentinel.scroll_past();
                    }
                    Input::Query(query) => session.set_query(query),
                    Input::Quit => break,
                }
            }
        }
    }

    let state = session.unmount().await?;
    tracing::debug!(query = %state.query, page = state.page, "Browse session ended");
    Ok(())
}

fn print_view(view: &FeedView) {
    println!("{}", "─".repeat(60));
    print!("{}", feed_text(view));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input(""), Input::Scroll);
        assert_eq!(parse_input("   "), Input::Scroll);
        assert_eq!(parse_input("q"), Input::Quit);
        assert_eq!(parse_input("/react hooks"), Input::Query("react hooks".to_string()));
        assert_eq!(parse_input("/"), Input::Query(String::new()));
        assert_eq!(parse_input("/q"), Input::Query("q".to_string()));
        assert_eq!(parse_input("rust"), Input::Query("rust".to_string()));
    }
}
