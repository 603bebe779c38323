//! Deck catalog hook.
//!
//! Duelhall does not own card or deck authoring — that lives in an
//! external catalog service. The engine only needs one capability from
//! it: expand a deck id into the full card list at selection time. This
//! trait is that seam; implement it against your catalog backend, or
//! use [`FixedCatalog`] in tests and demos.

use std::collections::HashMap;

use duelhall_match::CardSpec;
use duelhall_protocol::DeckId;

/// Errors from the external catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// No deck with this id.
    #[error("deck {0} not found")]
    DeckNotFound(DeckId),

    /// The catalog backend failed.
    #[error("catalog backend error: {0}")]
    Backend(String),
}

/// Expands deck ids into card lists.
///
/// `Send + Sync + 'static` so the engine can call it from any task for
/// the life of the process.
pub trait DeckCatalog: Send + Sync + 'static {
    /// Returns the deck's full card list, duplicates included, in
    /// catalog order.
    fn fetch_deck(
        &self,
        deck_id: &DeckId,
    ) -> impl std::future::Future<Output = Result<Vec<CardSpec>, CatalogError>> + Send;
}

/// An in-memory catalog seeded up front. Useful in tests and demos; a
/// production embedding implements [`DeckCatalog`] against its own
/// storage instead.
#[derive(Debug, Clone, Default)]
pub struct FixedCatalog {
    decks: HashMap<DeckId, Vec<CardSpec>>,
}

impl FixedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a deck under the given id, replacing any previous list.
    pub fn with_deck(mut self, deck_id: DeckId, cards: Vec<CardSpec>) -> Self {
        self.decks.insert(deck_id, cards);
        self
    }
}

impl DeckCatalog for FixedCatalog {
    async fn fetch_deck(&self, deck_id: &DeckId) -> Result<Vec<CardSpec>, CatalogError> {
        self.decks
            .get(deck_id)
            .cloned()
            .ok_or_else(|| CatalogError::DeckNotFound(deck_id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str) -> CardSpec {
        CardSpec {
            name: name.into(),
            cost: 1,
            attack: 1,
            health: 1,
            effect: String::new(),
            faction: "Neutral".into(),
        }
    }

    #[tokio::test]
    async fn test_fixed_catalog_returns_registered_deck() {
        let catalog = FixedCatalog::new().with_deck(DeckId("d1".into()), vec![spec("a"), spec("b")]);

        let cards = catalog.fetch_deck(&DeckId("d1".into())).await.unwrap();

        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].name, "a");
    }

    #[tokio::test]
    async fn test_fixed_catalog_unknown_deck_errors() {
        let catalog = FixedCatalog::new();
        let result = catalog.fetch_deck(&DeckId("missing".into())).await;
        assert!(matches!(result, Err(CatalogError::DeckNotFound(_))));
    }
}
