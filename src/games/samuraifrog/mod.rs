/*
Game: Samurai Frog (a Take-N style row game)
Players simultaneously commit one card per trick; cards resolve in ascending
order onto four shared rows, and a card no row can take costs its player the
whole row's penalty cards. Last player under the penalty threshold wins.
*/

pub mod animator;
pub mod cards;
pub mod player;
pub mod resolver;
pub mod session;

// Re-export the main types
pub use animator::{CardMotion, RevealAnimator, RevealTimer};
pub use cards::{generate_deck, Card, Row};
pub use player::{ChoiceProvider, Player};
pub use resolver::{Commitment, PlacementEntry, Resolution, RoundResolver};
pub use session::{ConfigError, GameConfig, GameSession, RevealedCard, State};
