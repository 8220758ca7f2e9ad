//! Demo data
//!
//! One author and `articles` articles written by them, with ids counting
//! from 1 in creation order.

use super::MemoryStore;
use crate::error::Result;
use crate::resource::{Article, Author, Resource};
use chrono::{SubsecRound, Utc};
use tracing::info;

const TITLES: [&str; 5] = [
    "A Wizard of Earthsea",
    "The Dispossessed",
    "The Lathe of Heaven",
    "The Word for World Is Forest",
    "Always Coming Home",
];

/// Populate `store` with demo records
pub async fn seed_store(store: &MemoryStore, articles: usize) -> Result<()> {
    let author = Author {
        id: "1".to_string(),
        name: "Ursula K. Le Guin".to_string(),
    };
    store.insert(author.to_resource()).await?;

    // Whole seconds, matching the stamp the store writes on save
    let now = Utc::now().trunc_subsecs(0);
    for n in 1..=articles {
        let title = match TITLES.get(n - 1) {
            Some(title) => (*title).to_string(),
            None => format!("{} (vol. {n})", TITLES[(n - 1) % TITLES.len()]),
        };
        let article = Article {
            id: n.to_string(),
            title,
            body: format!("Paragraph one of article {n}.\n\nParagraph two of article {n}."),
            author_id: author.id.clone(),
            created_at: Some(now),
            updated_at: Some(now),
        };
        store.insert(article.to_resource()).await?;
    }

    info!(articles, "Seeded store");
    Ok(())
}
