//! Print the feed as it looks for a given query and page

use anyhow::{ensure, Result};

use crate::feed::{FeedController, FeedView, RevealOutcome};
use crate::helpers::feed_text;
use crate::Folio;

/// Print the derived view for `query` with `page` pages revealed
pub fn run(folio: &Folio, query: Option<&str>, page: usize, json: bool) -> Result<()> {
    ensure!(page >= 1, "page must be at least 1");

    let posts = folio.load_posts()?;
    let mut controller = folio.controller(posts);
    let view = view_at(&mut controller, query.unwrap_or_default(), page);

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", feed_text(&view));
    }
    Ok(())
}

/// Reveal pages without the delay until `page` is reached or nothing is left
pub fn view_at(controller: &mut FeedController, query: &str, page: usize) -> FeedView {
    controller.set_query(query);
    while controller.state().page < page {
        let Some(ticket) = controller.begin_reveal() else {
            break;
        };
        if !matches!(controller.complete_reveal(ticket), RevealOutcome::Applied { .. }) {
            break;
        }
    }
    controller.view()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::content::Post;
    use crate::feed::{FeedOptions, FeedStatus};
    use crate::search::RelevanceIndex;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn controller(n: usize) -> FeedController {
        let date = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
        let posts: Arc<[Post]> = (0..n)
            .map(|i| Post::new(format!("Post {}", i), date))
            .collect::<Vec<_>>()
            .into();
        FeedController::new(
            RelevanceIndex::new(posts, &SearchConfig::default()),
            FeedOptions::default(),
        )
    }

    #[test]
    fn test_view_at_page() {
        let mut c = controller(10);
        let view = view_at(&mut c, "", 2);
        assert_eq!(view.state.page, 2);
        assert_eq!(view.status, FeedStatus::More { shown: 8, total: 10 });
    }

    #[test]
    fn test_view_at_stops_when_exhausted() {
        let mut c = controller(6);
        let view = view_at(&mut c, "", 9);
        assert_eq!(view.state.page, 2);
        assert_eq!(view.status, FeedStatus::End { total: 6 });
    }
}
