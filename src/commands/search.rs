//! Rank posts against a query

use anyhow::Result;

use crate::helpers::matches_text;
use crate::Folio;

/// Print the ranked matches for a query
pub fn run(folio: &Folio, query: &str, limit: usize) -> Result<()> {
    let posts = folio.load_posts()?;
    let index = folio.index(posts.clone());
    let matches = index.ranked(query);

    tracing::debug!("{} of {} posts match {:?}", matches.len(), posts.len(), query);
    print!("{}", matches_text(&posts, &matches, limit));
    Ok(())
}
