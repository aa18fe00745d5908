use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::cards::Card;

/// How a seat produces its commitment each trick. Picked once at
/// construction instead of branching on a "human" flag during resolution.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ChoiceProvider {
    /// Bot seats: a uniformly random card from hand the moment a trick opens.
    #[default]
    ImmediateRandom,
    /// Human seats: the choice arrives through the session's input API.
    External,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub name: String,
    pub provider: ChoiceProvider,
    pub hand: Vec<Card>,
    pub penalty_points: i32,
    pub alive: bool,
}

impl Player {
    pub fn bot(name: impl Into<String>) -> Player {
        Player {
            name: name.into(),
            provider: ChoiceProvider::ImmediateRandom,
            hand: vec![],
            penalty_points: 0,
            alive: true,
        }
    }

    pub fn human(name: impl Into<String>) -> Player {
        Player {
            provider: ChoiceProvider::External,
            ..Player::bot(name)
        }
    }

    pub fn is_external(&self) -> bool {
        self.provider == ChoiceProvider::External
    }

    /// `None` for external seats; their commitment is supplied to the session
    /// directly.
    pub fn choose_card(&self, rng: &mut impl Rng) -> Option<Card> {
        match self.provider {
            ChoiceProvider::ImmediateRandom => self.hand.choose(rng).copied(),
            ChoiceProvider::External => None,
        }
    }

    /// Removes by value match. A miss is a no-op: bookkeeping slips must not
    /// crash a running game.
    pub fn remove_from_hand(&mut self, card: Card) {
        self.hand.retain(|c| c.value != card.value);
    }

    pub fn apply_penalty(&mut self, cards: &[Card]) {
        self.penalty_points += cards.iter().map(|c| c.penalty).sum::<i32>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn card(value: i32) -> Card {
        Card { value, penalty: 1 }
    }

    #[test]
    fn test_bot_chooses_from_hand() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut bot = Player::bot("Bot 1");
        bot.hand = vec![card(3), card(8), card(21)];
        for _ in 0..20 {
            let chosen = bot.choose_card(&mut rng).expect("bot with cards always chooses");
            assert!(bot.hand.contains(&chosen));
        }
    }

    #[test]
    fn test_human_never_chooses() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut human = Player::human("Player 1");
        human.hand = vec![card(3)];
        assert_eq!(human.choose_card(&mut rng), None);
    }

    #[test]
    fn test_remove_from_hand_missing_card_is_noop() {
        let mut bot = Player::bot("Bot 1");
        bot.hand = vec![card(3), card(8)];
        bot.remove_from_hand(card(99));
        assert_eq!(bot.hand.len(), 2);
        bot.remove_from_hand(card(8));
        assert_eq!(bot.hand, vec![card(3)]);
    }

    #[test]
    fn test_apply_penalty_sums_card_penalties() {
        let mut bot = Player::bot("Bot 1");
        bot.apply_penalty(&[
            Card { value: 1, penalty: 2 },
            Card { value: 2, penalty: 5 },
        ]);
        assert_eq!(bot.penalty_points, 7);
        bot.apply_penalty(&[]);
        assert_eq!(bot.penalty_points, 7);
    }
}
