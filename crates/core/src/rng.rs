//! Seeded shoe shuffling
//!
//! A round is dealt from one shuffled 52-card shoe. The same seed always deals
//! the same round, which keeps scripted play and tests reproducible.

use crate::deck::{Deck, Pile};
use crate::types::{Card, Rank, Suit};

const LCG_MUL: u32 = 1_664_525;
const LCG_INC: u32 = 1_013_904_223;

/// 32-bit linear congruential generator driving the shuffle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoeRng(u32);

impl ShoeRng {
    /// Seed `0` is remapped to `1` so the sequence never sticks.
    pub fn new(seed: u32) -> Self {
        Self(seed.max(1))
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 = self.0.wrapping_mul(LCG_MUL).wrapping_add(LCG_INC);
        self.0
    }

    /// Uniform-ish index in `0..bound`
    pub fn below(&mut self, bound: usize) -> usize {
        (self.next_u32() % bound as u32) as usize
    }

    /// Seed for the round that follows one dealt from `seed`
    pub fn successor(seed: u32) -> u32 {
        Self::new(seed).next_u32()
    }

    /// Fisher-Yates, walking from the top of the pile down
    pub fn shuffle_cards(&mut self, cards: &mut [Card]) {
        for top in (1..cards.len()).rev() {
            let pick = self.below(top + 1);
            cards.swap(top, pick);
        }
    }
}

/// All 52 cards, ordered by suit then rank
pub fn standard_cards() -> Vec<Card> {
    Suit::ALL
        .iter()
        .flat_map(|&s| Rank::ALL.iter().map(move |&r| Card::new(r, s)))
        .collect()
}

/// A freshly shuffled draw pile for `seed`
///
/// Cards in the shoe are face down until dealt.
pub fn shuffled_shoe(seed: u32) -> Deck {
    let mut cards = standard_cards();
    ShoeRng::new(seed).shuffle_cards(&mut cards);
    for card in cards.iter_mut() {
        card.set_face_up(false);
    }
    Deck::from_cards(Pile::Draw, cards)
}
