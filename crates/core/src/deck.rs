//! Deck module - ordered, owned piles of cards
//!
//! A deck is stored bottom→top; the top card is the last element. Decks own
//! their cards outright: cloning a deck clones every card, so a clone can be
//! mutated freely without touching the original.
//!
//! Decks can optionally record "card added"/"card removed" notifications.
//! Display decks drain them with [`Deck::take_changes`]; the deck itself holds
//! no reference to any consumer.

use serde::{Deserialize, Serialize};

use crate::types::{Card, Lane};

/// Which pile on the table a deck represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pile {
    Draw,
    Active,
    Lane(Lane),
    /// Transient pile used while dealing cleared cards back during undo.
    Ghost(Lane),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Removed,
}

/// Notification raised when a deck gains or loses a card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckChange {
    pub kind: ChangeKind,
    pub card: Card,
    pub pile: Pile,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Deck {
    pile: Pile,
    cards: Vec<Card>,
    #[serde(skip)]
    changes: Option<Vec<DeckChange>>,
}

impl Deck {
    /// Create an empty deck
    pub fn new(pile: Pile) -> Self {
        Self {
            pile,
            cards: Vec::new(),
            changes: None,
        }
    }

    /// Create a deck from cards ordered bottom→top
    pub fn from_cards(pile: Pile, cards: Vec<Card>) -> Self {
        Self {
            pile,
            cards,
            changes: None,
        }
    }

    pub fn pile(&self) -> Pile {
        self.pile
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards ordered bottom→top
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn top_card(&self) -> Option<&Card> {
        self.cards.last()
    }

    pub fn top_card_mut(&mut self) -> Option<&mut Card> {
        self.cards.last_mut()
    }

    pub fn put_top_card(&mut self, card: Card) {
        self.cards.push(card);
        self.notify(ChangeKind::Added, card);
    }

    pub fn take_top_card(&mut self) -> Option<Card> {
        let card = self.cards.pop()?;
        self.notify(ChangeKind::Removed, card);
        Some(card)
    }

    /// Remove the first card matching `card` by rank and suit
    pub fn remove_card(&mut self, card: &Card) -> bool {
        let Some(i) = self.cards.iter().position(|c| c.card_equals(card)) else {
            return false;
        };
        let removed = self.cards.remove(i);
        self.notify(ChangeKind::Removed, removed);
        true
    }

    /// Remove every card, returning them bottom→top
    pub fn clear(&mut self) -> Vec<Card> {
        let cards = std::mem::take(&mut self.cards);
        for &card in cards.iter().rev() {
            self.notify(ChangeKind::Removed, card);
        }
        cards
    }

    /// Replace the contents with clones of `other`'s cards
    pub fn replace_with(&mut self, other: &Deck) {
        self.clear();
        for &card in other.cards.iter() {
            self.put_top_card(card);
        }
    }

    /// Order-sensitive comparison of rank and suit
    pub fn deck_equals(&self, other: &Deck) -> bool {
        self.cards.len() == other.cards.len()
            && self
                .cards
                .iter()
                .zip(other.cards.iter())
                .all(|(a, b)| a.card_equals(b))
    }

    /// Start recording change notifications
    pub fn observe(&mut self) {
        if self.changes.is_none() {
            self.changes = Some(Vec::new());
        }
    }

    /// Drain recorded notifications (empty when not observed)
    pub fn take_changes(&mut self) -> Vec<DeckChange> {
        self.changes.as_mut().map(std::mem::take).unwrap_or_default()
    }

    fn notify(&mut self, kind: ChangeKind, card: Card) {
        if let Some(changes) = self.changes.as_mut() {
            changes.push(DeckChange {
                kind,
                card,
                pile: self.pile,
            });
        }
    }
}

/// Deep clone: the copy owns its own cards and starts with no observers.
impl Clone for Deck {
    fn clone(&self) -> Self {
        Self {
            pile: self.pile,
            cards: self.cards.clone(),
            changes: None,
        }
    }
}

impl PartialEq for Deck {
    fn eq(&self, other: &Self) -> bool {
        self.deck_equals(other)
    }
}

impl Eq for Deck {}

impl std::fmt::Display for Deck {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (i, card) in self.cards.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", card)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck(s: &str) -> Deck {
        Deck::from_cards(Pile::Lane(Lane::new(0)), Card::parse(s).unwrap())
    }

    #[test]
    fn test_top_card_on_empty() {
        let mut d = Deck::new(Pile::Draw);
        assert!(d.top_card().is_none());
        assert!(d.take_top_card().is_none());
    }

    #[test]
    fn test_top_is_last() {
        let mut d = deck("2c 7h");
        assert_eq!(d.top_card().map(|c| c.to_string()), Some("7h".to_string()));
        d.put_top_card(Card::try_from("Ks").unwrap());
        assert_eq!(d.top_card().map(|c| c.to_string()), Some("Ks".to_string()));
        assert_eq!(d.len(), 3);
    }

    #[test]
    fn test_clone_is_deep() {
        let original = deck("2c 7h 9d");
        let mut copy = original.clone();
        copy.take_top_card();
        copy.top_card_mut().unwrap().set_face_up(false);
        copy.put_top_card(Card::try_from("As").unwrap());

        assert_eq!(original.to_string(), "2c 7h 9d");
        assert!(original.cards().iter().all(|c| c.face_up()));
        assert!(!original.deck_equals(&copy));
    }

    #[test]
    fn test_deck_equals_is_order_sensitive() {
        assert!(deck("2c 7h").deck_equals(&deck("2c 7h")));
        assert!(!deck("2c 7h").deck_equals(&deck("7h 2c")));
        assert!(!deck("2c 7h").deck_equals(&deck("2c")));
        assert!(!deck("2c 7h").deck_equals(&deck("2c 7d")));
    }

    #[test]
    fn test_deck_equals_ignores_face_and_pile() {
        let a = deck("2c 7h");
        let mut b = Deck::from_cards(Pile::Draw, a.cards().to_vec());
        b.top_card_mut().unwrap().set_face_up(false);
        assert!(a.deck_equals(&b));
    }

    #[test]
    fn test_notifications_only_when_observed() {
        let mut d = deck("2c");
        d.put_top_card(Card::try_from("3c").unwrap());
        assert!(d.take_changes().is_empty());

        d.observe();
        d.put_top_card(Card::try_from("4c").unwrap());
        d.take_top_card();
        let changes = d.take_changes();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].kind, ChangeKind::Added);
        assert_eq!(changes[1].kind, ChangeKind::Removed);
        assert_eq!(changes[1].pile, Pile::Lane(Lane::new(0)));
        assert!(d.take_changes().is_empty());
    }

    #[test]
    fn test_replace_with() {
        let mut d = deck("2c 3c");
        d.observe();
        d.replace_with(&deck("Kh"));
        assert_eq!(d.to_string(), "Kh");
        assert_eq!(d.pile(), Pile::Lane(Lane::new(0)));
        assert_eq!(d.take_changes().len(), 3);
    }

    #[test]
    fn test_remove_card() {
        let mut d = deck("2c 3c 4c");
        assert!(d.remove_card(&Card::try_from("3c").unwrap()));
        assert!(!d.remove_card(&Card::try_from("3c").unwrap()));
        assert_eq!(d.to_string(), "2c 4c");
    }
}
