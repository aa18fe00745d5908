use enum_iterator::Sequence;
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::thread_rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::animator::{
    CardMotion, RevealAnimator, RevealTimer, DEFAULT_ANIMATION_STEP, DEFAULT_REVEAL_DELAY,
};
use super::cards::{generate_deck, Card, Row, MAX_CARD_VALUE, PENALTY_WEIGHTS};
use super::player::Player;
use super::resolver::{Commitment, PlacementEntry, Resolution, RoundResolver};

pub const DEFAULT_ROW_COUNT: usize = 4;
pub const DEFAULT_HAND_SIZE: usize = 10;
pub const DEFAULT_ELIMINATION_THRESHOLD: i32 = 60;
pub const MAX_BOTS: usize = 9;
const HUMAN_SEAT: usize = 0;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("maxCardValue must be at least 1, got {0}")]
    InvalidMaxCardValue(i32),
    #[error("penalty weight table must contain at least one positive weight")]
    EmptyPenaltyWeights,
    #[error("rowCount must be at least 1, got {0}")]
    InvalidRowCount(usize),
    #[error("handSize must be at least 1, got {0}")]
    InvalidHandSize(usize),
    #[error("animationStep must lie in (0, 1], got {0}")]
    InvalidAnimationStep(f32),
}

/// Everything tunable, fixed at session construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    pub row_count: usize,
    pub hand_size: usize,
    pub elimination_threshold: i32,
    pub reveal_delay: u32,
    pub animation_step: f32,
    pub max_card_value: i32,
    pub penalty_weights: Vec<u32>,
}

impl Default for GameConfig {
    fn default() -> GameConfig {
        GameConfig {
            row_count: DEFAULT_ROW_COUNT,
            hand_size: DEFAULT_HAND_SIZE,
            elimination_threshold: DEFAULT_ELIMINATION_THRESHOLD,
            reveal_delay: DEFAULT_REVEAL_DELAY,
            animation_step: DEFAULT_ANIMATION_STEP,
            max_card_value: MAX_CARD_VALUE,
            penalty_weights: PENALTY_WEIGHTS.to_vec(),
        }
    }
}

impl GameConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_card_value < 1 {
            return Err(ConfigError::InvalidMaxCardValue(self.max_card_value));
        }
        if self.penalty_weights.iter().sum::<u32>() == 0 {
            return Err(ConfigError::EmptyPenaltyWeights);
        }
        if self.row_count < 1 {
            return Err(ConfigError::InvalidRowCount(self.row_count));
        }
        if self.hand_size < 1 {
            return Err(ConfigError::InvalidHandSize(self.hand_size));
        }
        if !(self.animation_step > 0.0 && self.animation_step <= 1.0) {
            return Err(ConfigError::InvalidAnimationStep(self.animation_step));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Sequence, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum State {
    #[default]
    Menu,
    Setup,
    Round,
    Reveal,
    Animate,
    PickRow,
    Leaderboard,
}

/// A committed card as the rendering side sees it during the reveal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct RevealedCard {
    pub seat: usize,
    pub card: Card,
    pub face_up: bool,
}

/// The whole table for one game: players, rows, deck, and the phase state
/// machine driving trick after trick until one player remains.
///
/// Single-threaded and tick-driven: an external caller invokes `advance`
/// once per tick; human input arrives through the `submit_*` methods and is
/// ignored whenever it is not valid for the current phase. Rows, hands and
/// penalties are mutated only when a plan is applied or a row choice lands;
/// the resolver and animator work on snapshots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    config: GameConfig,
    state: State,
    num_bots: usize,
    players: Vec<Player>,
    rows: Vec<Row>,
    deck: Vec<Card>,
    commitments: Vec<Option<Card>>,
    reveal_timer: RevealTimer,
    animator: RevealAnimator,
    resolver: Option<RoundResolver>,
    pending_choice: Option<(usize, Card)>,
    leaderboard: Vec<(String, i32)>,
}

impl GameSession {
    pub fn new() -> GameSession {
        GameSession::with_config(GameConfig::default())
            .expect("the default configuration is valid")
    }

    pub fn with_config(config: GameConfig) -> Result<GameSession, ConfigError> {
        config.validate()?;
        Ok(GameSession {
            config,
            state: State::Menu,
            num_bots: 0,
            players: vec![],
            rows: vec![],
            deck: vec![],
            commitments: vec![],
            reveal_timer: RevealTimer::default(),
            animator: RevealAnimator::default(),
            resolver: None,
            pending_choice: None,
            leaderboard: vec![],
        })
    }

    /// One tick from the external driver. Timers and the animator only move
    /// here; `Menu`, `PickRow` and `Leaderboard` wait on input indefinitely.
    pub fn advance(&mut self) {
        match self.state {
            State::Setup => self.run_setup(),
            State::Round => self.collect_bot_commitments(),
            State::Reveal => {
                if self.reveal_timer.tick() {
                    self.resolve_commitments();
                }
            }
            State::Animate => {
                if self.animator.update() {
                    let plan = std::mem::take(&mut self.animator).into_plan();
                    self.apply_placements(plan);
                    self.end_of_round();
                }
            }
            State::Menu | State::PickRow | State::Leaderboard => {}
        }
    }

    /// Menu-only. Ignored outside `1..=MAX_BOTS`.
    pub fn select_bot_count(&mut self, bots: usize) {
        if self.state != State::Menu || !(1..=MAX_BOTS).contains(&bots) {
            return;
        }
        self.num_bots = bots;
        self.state = State::Setup;
    }

    /// Round-only. Ignored unless the human is alive, uncommitted, and the
    /// value names a card in their hand.
    pub fn submit_human_card_choice(&mut self, card_value: i32) {
        if self.state != State::Round {
            return;
        }
        let human = &self.players[HUMAN_SEAT];
        if !human.alive || self.commitments[HUMAN_SEAT].is_some() {
            return;
        }
        let Some(card) = human.hand.iter().find(|c| c.value == card_value).copied() else {
            return;
        };
        self.commitments[HUMAN_SEAT] = Some(card);
        debug!("{} commits card {}", self.players[HUMAN_SEAT].name, card.value);
        self.begin_reveal_if_all_committed();
    }

    /// PickRow-only. Applies the takeover immediately, then resumes the
    /// resolver for whatever commitments remain in this trick.
    pub fn submit_human_row_choice(&mut self, row_index: usize) {
        if self.state != State::PickRow || row_index >= self.rows.len() {
            return;
        }
        let Some((seat, card)) = self.pending_choice.take() else {
            return;
        };
        self.take_over_row(seat, card, row_index);

        let mut resolver = self
            .resolver
            .take()
            .expect("a paused resolver backs every pending row choice");
        resolver.note_takeover(row_index, card);
        if resolver.is_exhausted() {
            self.end_of_round();
            return;
        }
        match resolver.run(&mut thread_rng()) {
            Resolution::Complete(plan) => self.start_animation(plan),
            Resolution::AwaitingRowChoice { seat, card } => {
                self.resolver = Some(resolver);
                self.pending_choice = Some((seat, card));
            }
        }
    }

    fn run_setup(&mut self) {
        self.deck = vec![];
        self.players = vec![Player::human("Player 1")];
        for bot in 1..=self.num_bots {
            self.players.push(Player::bot(format!("Bot {}", bot)));
        }
        self.leaderboard = vec![];
        info!("new game: 1 human, {} bots", self.num_bots);
        self.start_new_play();
    }

    fn collect_bot_commitments(&mut self) {
        let rng = &mut thread_rng();
        for seat in 0..self.players.len() {
            if self.commitments[seat].is_some() || !self.players[seat].alive {
                continue;
            }
            if let Some(card) = self.players[seat].choose_card(rng) {
                debug!("{} commits card {}", self.players[seat].name, card.value);
                self.commitments[seat] = Some(card);
            }
        }
        self.begin_reveal_if_all_committed();
    }

    fn begin_reveal_if_all_committed(&mut self) {
        let all_committed = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.alive)
            .all(|(seat, _)| self.commitments[seat].is_some());
        if all_committed {
            self.reveal_timer = RevealTimer::new(self.config.reveal_delay);
            self.state = State::Reveal;
        }
    }

    fn resolve_commitments(&mut self) {
        let commitments: Vec<Commitment> = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.alive)
            .map(|(seat, player)| Commitment {
                seat,
                card: self.commitments[seat]
                    .expect("the resolver requires a complete commitment map"),
                external: player.is_external(),
            })
            .collect();
        let mut resolver = RoundResolver::new(&self.rows, commitments);
        match resolver.run(&mut thread_rng()) {
            Resolution::Complete(plan) => self.start_animation(plan),
            Resolution::AwaitingRowChoice { seat, card } => {
                debug!("{} must take a row for card {}", self.players[seat].name, card.value);
                self.resolver = Some(resolver);
                self.pending_choice = Some((seat, card));
                self.state = State::PickRow;
            }
        }
    }

    fn start_animation(&mut self, plan: Vec<PlacementEntry>) {
        self.resolver = None;
        self.animator = RevealAnimator::new(plan, &self.rows, self.config.animation_step);
        self.state = State::Animate;
    }

    fn apply_placements(&mut self, plan: Vec<PlacementEntry>) {
        for entry in plan {
            if entry.takes_row {
                self.take_over_row(entry.seat, entry.card, entry.row_index);
            } else {
                self.players[entry.seat].remove_from_hand(entry.card);
                self.rows[entry.row_index].add_card(entry.card);
            }
        }
    }

    fn take_over_row(&mut self, seat: usize, card: Card, row_index: usize) {
        let penalty_cards = self.rows[row_index].take_over(card);
        let player = &mut self.players[seat];
        player.remove_from_hand(card);
        player.apply_penalty(&penalty_cards);
        info!(
            "{} takes row {} ({} cards) and now holds {} penalty points",
            player.name,
            row_index,
            penalty_cards.len(),
            player.penalty_points
        );
    }

    fn end_of_round(&mut self) {
        for player in &mut self.players {
            if player.alive && player.penalty_points > self.config.elimination_threshold {
                player.alive = false;
                self.leaderboard.push((player.name.clone(), player.penalty_points));
                info!("{} is out with {} penalty points", player.name, player.penalty_points);
            }
        }
        let alive = self.players.iter().filter(|p| p.alive).count();
        if alive == 1 {
            info!("game over");
            self.state = State::Leaderboard;
            return;
        }
        let hands_exhausted = self
            .players
            .iter()
            .filter(|p| p.alive)
            .all(|p| p.hand.is_empty());
        if hands_exhausted {
            self.start_new_play();
        } else {
            self.clear_commitments();
            self.state = State::Round;
        }
    }

    /// Deals fresh hands and reseeds the rows, regenerating the deck first
    /// when too few cards remain for a full deal.
    fn start_new_play(&mut self) {
        let rng = &mut thread_rng();
        let alive = self.players.iter().filter(|p| p.alive).count();
        let needed = self.config.hand_size * alive + self.config.row_count;
        if self.deck.len() < needed {
            self.deck = generate_deck(self.config.max_card_value, &self.config.penalty_weights, rng);
            self.deck.shuffle(rng);
            debug!("deck regenerated and shuffled");
        }
        for player in self.players.iter_mut().filter(|p| p.alive) {
            player.hand = (0..self.config.hand_size)
                .map(|_| {
                    self.deck
                        .pop()
                        .expect("the deck holds enough cards for a fresh deal")
                })
                .collect();
        }
        self.rows = (0..self.config.row_count)
            .map(|_| {
                Row::seeded(
                    self.deck
                        .pop()
                        .expect("the deck holds enough cards to seed every row"),
                )
            })
            .collect();
        self.clear_commitments();
        self.state = State::Round;
    }

    fn clear_commitments(&mut self) {
        self.commitments = vec![None; self.players.len()];
    }

    // Read-only snapshots for the rendering side.

    pub fn state(&self) -> State {
        self.state
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn human(&self) -> &Player {
        &self.players[HUMAN_SEAT]
    }

    pub fn has_committed(&self, seat: usize) -> bool {
        self.commitments.get(seat).map_or(false, |c| c.is_some())
    }

    pub fn motions(&self) -> &[CardMotion] {
        self.animator.motions()
    }

    pub fn pending_row_choice(&self) -> Option<(usize, Card)> {
        self.pending_choice
    }

    /// Committed cards sorted ascending by value, flagged face-up once the
    /// reveal delay has elapsed. The human always sees their own card.
    pub fn reveal_cards(&self) -> Vec<RevealedCard> {
        let mut revealed: Vec<RevealedCard> = self
            .commitments
            .iter()
            .enumerate()
            .filter_map(|(seat, committed)| {
                committed.map(|card| RevealedCard {
                    seat,
                    card,
                    face_up: self.players[seat].is_external() || self.reveal_timer.elapsed(),
                })
            })
            .collect();
        revealed.sort_by_key(|r| r.card.value);
        revealed
    }

    /// Eliminated players, worst-placed last (sorted ascending by points).
    pub fn leaderboard(&self) -> Vec<(String, i32)> {
        let mut standings = self.leaderboard.clone();
        standings.sort_by_key(|(_, points)| *points);
        standings
    }
}

impl Default for GameSession {
    fn default() -> GameSession {
        GameSession::new()
    }
}
