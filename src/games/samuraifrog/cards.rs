use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const MAX_CARD_VALUE: i32 = 110;
pub const PENALTY_WEIGHTS: [u32; 6] = [6, 5, 4, 3, 2, 1]; // weight for penalty 1 down to penalty 6

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub value: i32,
    pub penalty: i32,
}

/// Builds one card per value in `1..=max_value`. Values are unique per
/// generation, so value equality identifies a card. Penalties are sampled
/// independently per card from the weighted table, higher penalties rarer.
pub fn generate_deck(max_value: i32, penalty_weights: &[u32], rng: &mut impl Rng) -> Vec<Card> {
    assert!(max_value >= 1, "deck must contain at least one card");
    let penalty_distribution = WeightedIndex::new(penalty_weights.iter().copied())
        .expect("penalty weight table must be non-empty with a positive total");
    (1..=max_value)
        .map(|value| Card {
            value,
            penalty: penalty_distribution.sample(rng) as i32 + 1,
        })
        .collect()
}

/// An ordered pile on the table. Append-only, except for a takeover which
/// swaps the whole pile for a single new card.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    cards: Vec<Card>,
}

impl Row {
    pub fn seeded(card: Card) -> Row {
        Row { cards: vec![card] }
    }

    /// Appends a card. The resolver guarantees `card.value` exceeds the
    /// trailing value before calling; that ordering is not re-checked here.
    pub fn add_card(&mut self, card: Card) {
        assert!(!self.cards.is_empty(), "rows are seeded before cards are appended");
        self.cards.push(card);
    }

    /// Replaces the pile with `[card]` and returns the previous contents,
    /// whose summed penalty becomes the taking player's liability.
    pub fn take_over(&mut self, card: Card) -> Vec<Card> {
        std::mem::replace(&mut self.cards, vec![card])
    }

    pub fn last_value(&self) -> Option<i32> {
        self.cards.last().map(|card| card.value)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn penalty_sum(&self) -> i32 {
        self.cards.iter().map(|card| card.penalty).sum()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_deck_uniqueness() {
        let mut rng = StdRng::seed_from_u64(42);
        let deck = generate_deck(MAX_CARD_VALUE, &PENALTY_WEIGHTS, &mut rng);
        assert_eq!(deck.len(), 110);
        for value in 1..=MAX_CARD_VALUE {
            assert_eq!(
                deck.iter().filter(|c| c.value == value).count(),
                1,
                "value {} should appear exactly once",
                value
            );
        }
        assert!(deck.iter().all(|c| (1..=6).contains(&c.penalty)));
    }

    #[test]
    fn test_penalty_weighting_favors_low_penalties() {
        let mut rng = StdRng::seed_from_u64(7);
        // Large sample so the weighted sampling is visible in aggregate
        let deck = generate_deck(10_000, &PENALTY_WEIGHTS, &mut rng);
        let ones = deck.iter().filter(|c| c.penalty == 1).count();
        let sixes = deck.iter().filter(|c| c.penalty == 6).count();
        assert!(ones > sixes * 2, "penalty 1 ({}) should be far more common than penalty 6 ({})", ones, sixes);
    }

    #[test]
    fn test_row_append_and_last_value() {
        let mut row = Row::seeded(Card { value: 4, penalty: 1 });
        assert_eq!(row.last_value(), Some(4));
        row.add_card(Card { value: 9, penalty: 2 });
        row.add_card(Card { value: 15, penalty: 1 });
        assert_eq!(row.last_value(), Some(15));
        assert_eq!(row.len(), 3);
        assert_eq!(row.penalty_sum(), 4);
    }

    #[test]
    fn test_row_take_over_returns_previous_contents() {
        let mut row = Row::seeded(Card { value: 4, penalty: 1 });
        row.add_card(Card { value: 9, penalty: 2 });
        let previous = row.take_over(Card { value: 3, penalty: 5 });
        assert_eq!(previous.len(), 2);
        assert_eq!(previous.iter().map(|c| c.penalty).sum::<i32>(), 3);
        assert_eq!(row.last_value(), Some(3));
        assert_eq!(row.len(), 1);
    }

    #[test]
    #[should_panic(expected = "rows are seeded")]
    fn test_row_append_before_seed_panics() {
        let mut row = Row::default();
        row.add_card(Card { value: 1, penalty: 1 });
    }
}
