use serde::{Deserialize, Serialize};

use super::cards::Row;
use super::resolver::PlacementEntry;

pub const DEFAULT_REVEAL_DELAY: u32 = 60; // ticks before committed cards flip face-up
pub const DEFAULT_ANIMATION_STEP: f32 = 0.05; // progress per tick, 20 ticks to a slot

// Abstract board units for interpolated positions. Renderers map these onto
// whatever surface they draw to; the library itself never touches a display.
const BOARD_WIDTH: f32 = 1200.0;
const BOARD_HEIGHT: f32 = 800.0;
const CARD_WIDTH: f32 = 70.0;
const CARD_HEIGHT: f32 = 100.0;
const REVEAL_SPACING: f32 = 10.0;
const ROW_SPACING: f32 = 100.0;
const ROW_INSET: f32 = 20.0;

/// Counts ticks while committed cards sit face-down in the reveal zone.
/// Presentation-only: it gates when the resolver runs, nothing else.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct RevealTimer {
    ticks: u32,
    delay: u32,
}

impl RevealTimer {
    pub fn new(delay: u32) -> RevealTimer {
        RevealTimer { ticks: 0, delay }
    }

    /// Advances one tick and reports whether the delay has elapsed.
    pub fn tick(&mut self) -> bool {
        self.ticks += 1;
        self.elapsed()
    }

    pub fn elapsed(&self) -> bool {
        self.ticks > self.delay
    }
}

/// One planned card sliding from the reveal zone to its row slot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardMotion {
    pub entry: PlacementEntry,
    start: (f32, f32),
    end: (f32, f32),
    progress: f32,
}

impl CardMotion {
    fn update(&mut self, step: f32) -> bool {
        self.progress = (self.progress + step).min(1.0);
        self.progress >= 1.0
    }

    pub fn position(&self) -> (f32, f32) {
        let (sx, sy) = self.start;
        let (ex, ey) = self.end;
        (sx + (ex - sx) * self.progress, sy + (ey - sy) * self.progress)
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }
}

/// Tick-driven movement for a whole placement plan. All motions advance in
/// lockstep by a fixed increment per tick; game state is untouched until the
/// session applies the plan after the animation completes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RevealAnimator {
    motions: Vec<CardMotion>,
    step: f32,
}

impl RevealAnimator {
    /// Starts are laid out centered in the reveal zone in plan order; ends
    /// are the destination row slots. A takeover lands on the row's top slot,
    /// a placement under the current stack.
    pub fn new(plan: Vec<PlacementEntry>, rows: &[Row], step: f32) -> RevealAnimator {
        let count = plan.len() as f32;
        let reveal_start_x = BOARD_WIDTH / 2.0 - count * (CARD_WIDTH + REVEAL_SPACING) / 2.0;
        let start_y = BOARD_HEIGHT / 2.0 - CARD_HEIGHT / 2.0;
        let row_top_y = BOARD_HEIGHT / 2.0 - 2.0 * (CARD_HEIGHT + REVEAL_SPACING) + REVEAL_SPACING;

        let motions = plan
            .into_iter()
            .enumerate()
            .map(|(reveal_offset, entry)| {
                let row_x = BOARD_WIDTH / 2.0 - 2.0 * (CARD_WIDTH + 2.0 * ROW_INSET)
                    + entry.row_index as f32 * (CARD_WIDTH + ROW_SPACING)
                    + ROW_INSET;
                let end_y = if entry.takes_row {
                    row_top_y
                } else {
                    row_top_y + rows[entry.row_index].len() as f32 * (CARD_HEIGHT / 2.0)
                };
                CardMotion {
                    entry,
                    start: (
                        reveal_start_x + reveal_offset as f32 * (CARD_WIDTH + REVEAL_SPACING),
                        start_y,
                    ),
                    end: (row_x, end_y),
                    progress: 0.0,
                }
            })
            .collect();
        RevealAnimator { motions, step }
    }

    /// Advances every motion one tick; true once all cards sit in their slot.
    pub fn update(&mut self) -> bool {
        let mut done = true;
        for motion in &mut self.motions {
            if !motion.update(self.step) {
                done = false;
            }
        }
        done
    }

    pub fn motions(&self) -> &[CardMotion] {
        &self.motions
    }

    /// Hands the plan back for the apply phase once movement is finished.
    pub fn into_plan(self) -> Vec<PlacementEntry> {
        self.motions.into_iter().map(|motion| motion.entry).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::samuraifrog::cards::Card;

    fn plan_entry(value: i32, row_index: usize, takes_row: bool) -> PlacementEntry {
        PlacementEntry {
            seat: 0,
            card: Card { value, penalty: 1 },
            row_index,
            takes_row,
        }
    }

    fn table() -> Vec<Row> {
        (1..=4).map(|v| Row::seeded(Card { value: v, penalty: 1 })).collect()
    }

    #[test]
    fn test_reveal_timer_gates_until_delay_passes() {
        let mut timer = RevealTimer::new(3);
        assert!(!timer.tick());
        assert!(!timer.tick());
        assert!(!timer.tick());
        assert!(timer.tick());
        assert!(timer.elapsed());
    }

    #[test]
    fn test_motions_complete_in_lockstep() {
        let mut animator = RevealAnimator::new(
            vec![plan_entry(8, 0, false), plan_entry(9, 3, true)],
            &table(),
            DEFAULT_ANIMATION_STEP,
        );
        for tick in 1..20 {
            assert!(!animator.update(), "not done after {} ticks", tick);
        }
        assert!(animator.update(), "all motions finish on tick 20");
        assert!(animator.motions().iter().all(|m| m.progress() >= 1.0));
    }

    #[test]
    fn test_position_interpolates_between_start_and_end() {
        let mut animator =
            RevealAnimator::new(vec![plan_entry(8, 1, false)], &table(), 0.5);
        let start = animator.motions()[0].position();
        animator.update();
        let midway = animator.motions()[0].position();
        animator.update();
        let end = animator.motions()[0].position();
        assert_eq!(midway.0, (start.0 + end.0) / 2.0);
        assert_eq!(midway.1, (start.1 + end.1) / 2.0);
        let motion = &animator.motions()[0];
        assert_eq!(motion.position(), motion.end);
    }

    #[test]
    fn test_empty_plan_is_done_immediately() {
        let mut animator = RevealAnimator::new(vec![], &table(), DEFAULT_ANIMATION_STEP);
        assert!(animator.update());
    }

    #[test]
    fn test_takeover_lands_on_row_top_slot() {
        let mut rows = table();
        rows[2].add_card(Card { value: 50, penalty: 1 });
        rows[2].add_card(Card { value: 60, penalty: 1 });
        let stacked = RevealAnimator::new(vec![plan_entry(70, 2, false)], &rows, 1.0);
        let taken = RevealAnimator::new(vec![plan_entry(2, 2, true)], &rows, 1.0);
        let stacked_end = stacked.motions()[0].end;
        let taken_end = taken.motions()[0].end;
        assert_eq!(stacked_end.0, taken_end.0);
        assert!(taken_end.1 < stacked_end.1, "a takeover ignores the stack height");
    }
}
