use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::cards::{Card, Row};

/// One seat's committed card for the current trick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Commitment {
    pub seat: usize,
    pub card: Card,
    /// External seats cannot take over a random row; resolution pauses for
    /// their choice instead.
    pub external: bool,
}

/// An intended placement. Rows are only mutated later, during the apply
/// phase, so reveal and animation run against a stable snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct PlacementEntry {
    pub seat: usize,
    pub card: Card,
    pub row_index: usize,
    pub takes_row: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Resolution {
    /// Every commitment was processed; the plan is ready to animate and apply.
    Complete(Vec<PlacementEntry>),
    /// An external seat committed a card with no eligible row and must pick
    /// one. Unprocessed commitments stay queued inside the resolver.
    AwaitingRowChoice { seat: usize, card: Card },
}

/// Resumable placement computation for one trick.
///
/// Commitments are processed in ascending card-value order (the canonical
/// play order; values are unique so ties cannot occur). Placements recorded
/// earlier in the trick change which rows are eligible for later cards, so
/// the resolver keeps a shadow of each row's trailing value and updates it
/// as entries are planned. When an external seat has no eligible row the
/// loop stops; `note_takeover` plus a second `run` picks up at the next
/// unprocessed commitment with the plan so far intact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoundResolver {
    queue: VecDeque<Commitment>,
    plan: Vec<PlacementEntry>,
    last_values: Vec<i32>,
}

impl RoundResolver {
    pub fn new(rows: &[Row], mut commitments: Vec<Commitment>) -> RoundResolver {
        commitments.sort_by_key(|c| c.card.value);
        let last_values = rows
            .iter()
            .map(|row| {
                row.last_value()
                    .expect("rows are seeded at the start of every play")
            })
            .collect();
        RoundResolver {
            queue: commitments.into(),
            plan: vec![],
            last_values,
        }
    }

    pub fn run(&mut self, rng: &mut impl Rng) -> Resolution {
        while let Some(commitment) = self.queue.pop_front() {
            match self.closest_fit(commitment.card) {
                Some(row_index) => {
                    self.last_values[row_index] = commitment.card.value;
                    self.plan.push(PlacementEntry {
                        seat: commitment.seat,
                        card: commitment.card,
                        row_index,
                        takes_row: false,
                    });
                }
                None if commitment.external => {
                    return Resolution::AwaitingRowChoice {
                        seat: commitment.seat,
                        card: commitment.card,
                    };
                }
                None => {
                    let row_index = rng.gen_range(0..self.last_values.len());
                    self.last_values[row_index] = commitment.card.value;
                    self.plan.push(PlacementEntry {
                        seat: commitment.seat,
                        card: commitment.card,
                        row_index,
                        takes_row: true,
                    });
                }
            }
        }
        Resolution::Complete(std::mem::take(&mut self.plan))
    }

    /// Records a takeover applied outside the plan (the human's row choice)
    /// so later commitments in the same trick see the updated row.
    pub fn note_takeover(&mut self, row_index: usize, card: Card) {
        self.last_values[row_index] = card.value;
    }

    pub fn is_exhausted(&self) -> bool {
        self.queue.is_empty()
    }

    /// The eligible row closest below the card's value. Diffs are unique
    /// because values are, and a strict comparison keeps the lowest index on
    /// the impossible tie.
    fn closest_fit(&self, card: Card) -> Option<usize> {
        let mut best: Option<(usize, i32)> = None;
        for (row_index, last_value) in self.last_values.iter().enumerate() {
            if *last_value >= card.value {
                continue;
            }
            let diff = card.value - last_value;
            if best.map_or(true, |(_, best_diff)| diff < best_diff) {
                best = Some((row_index, diff));
            }
        }
        best.map(|(row_index, _)| row_index)
    }
}
