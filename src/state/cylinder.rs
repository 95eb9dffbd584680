//! Six-chamber revolver cylinder: the pure data model the whole game turns on.

use rand::Rng;
use rand::seq::index;

use crate::error::{GameError, GameResult};

/// Number of chambers in the cylinder. Fixed; the cylinder is never resized.
pub const CHAMBER_COUNT: usize = 6;

/// The revolver cylinder: six chambers, each possibly holding a live round,
/// plus the cursor pointing at the chamber the next trigger pull strikes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cylinder {
    chambers: [bool; CHAMBER_COUNT],
    cursor: usize,
}

/// Result of firing the chamber under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FireOutcome {
    /// The fired chamber held a live round.
    pub hit: bool,
    /// No live rounds remain after this fire; the game is over.
    pub exhausted: bool,
}

impl Cylinder {
    /// Load `bullet_count` rounds into distinct chambers chosen uniformly at
    /// random without replacement, with the cursor reset to the first chamber.
    pub fn load<R: Rng + ?Sized>(rng: &mut R, bullet_count: u8) -> GameResult<Self> {
        if !(1..=CHAMBER_COUNT as u8).contains(&bullet_count) {
            return Err(GameError::InvalidCount {
                count: bullet_count,
            });
        }

        let mut chambers = [false; CHAMBER_COUNT];
        for position in index::sample(rng, CHAMBER_COUNT, bullet_count as usize) {
            chambers[position] = true;
        }

        Ok(Self {
            chambers,
            cursor: 0,
        })
    }

    /// Fire the chamber under the cursor.
    ///
    /// A hit clears its chamber: a fired round can never be live again, even
    /// if the same game continues. The cursor advances with wraparound on
    /// every fire regardless of the outcome.
    pub fn fire(&mut self) -> FireOutcome {
        let hit = self.chambers[self.cursor];
        if hit {
            self.chambers[self.cursor] = false;
        }
        self.cursor = (self.cursor + 1) % CHAMBER_COUNT;

        FireOutcome {
            hit,
            exhausted: self.remaining() == 0,
        }
    }

    /// Number of live rounds still in the cylinder.
    pub fn remaining(&self) -> usize {
        self.chambers.iter().filter(|live| **live).count()
    }

    /// Whether the chamber under the cursor holds a live round.
    pub fn current_is_live(&self) -> bool {
        self.chambers[self.cursor]
    }

    /// Index of the chamber the next fire will strike.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Build a cylinder from a fixed chamber arrangement, cursor at zero.
    #[cfg(test)]
    pub(crate) fn from_chambers(chambers: [bool; CHAMBER_COUNT]) -> Self {
        Self {
            chambers,
            cursor: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn load_places_exactly_the_requested_rounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for count in 1..=6u8 {
            let cylinder = Cylinder::load(&mut rng, count).unwrap();
            assert_eq!(cylinder.remaining(), count as usize);
            assert_eq!(cylinder.cursor(), 0);
        }
    }

    #[test]
    fn load_rejects_out_of_range_counts() {
        let mut rng = StdRng::seed_from_u64(7);
        for count in [0u8, 7, 200] {
            match Cylinder::load(&mut rng, count) {
                Err(GameError::InvalidCount { count: rejected }) => assert_eq!(rejected, count),
                other => panic!("expected InvalidCount, got {other:?}"),
            }
        }
    }

    #[test]
    fn load_positions_cover_every_chamber_over_many_trials() {
        let mut rng = StdRng::seed_from_u64(42);
        let trials = 600;
        let mut hits_per_position = [0u32; CHAMBER_COUNT];

        for _ in 0..trials {
            let cylinder = Cylinder::load(&mut rng, 1).unwrap();
            let position = cylinder
                .chambers
                .iter()
                .position(|live| *live)
                .expect("one round loaded");
            hits_per_position[position] += 1;
        }

        // Uniform placement puts ~100 rounds in each chamber; a heavily
        // skewed sampler would fail this loose bound.
        for (position, hits) in hits_per_position.iter().enumerate() {
            assert!(
                (50..=150).contains(hits),
                "position {position} drawn {hits} times out of {trials}"
            );
        }
    }

    #[test]
    fn six_fires_visit_each_chamber_exactly_once() {
        let mut rng = StdRng::seed_from_u64(11);
        for count in 1..=6u8 {
            let mut cylinder = Cylinder::load(&mut rng, count).unwrap();
            let mut hits = 0;
            for shot in 0..CHAMBER_COUNT {
                assert_eq!(cylinder.cursor(), shot);
                if cylinder.fire().hit {
                    hits += 1;
                }
            }
            assert_eq!(hits, count as usize);
            assert_eq!(cylinder.remaining(), 0);
            assert_eq!(cylinder.cursor(), 0, "cursor wraps back to the start");
        }
    }

    #[test]
    fn fully_loaded_cylinder_hits_on_every_fire() {
        let mut cylinder = Cylinder::from_chambers([true; CHAMBER_COUNT]);
        for shot in 0..CHAMBER_COUNT {
            let outcome = cylinder.fire();
            assert!(outcome.hit, "shot {shot} must hit");
            assert_eq!(outcome.exhausted, shot == CHAMBER_COUNT - 1);
        }
    }

    #[test]
    fn fixed_arrangement_fires_in_cursor_order() {
        let mut cylinder = Cylinder::from_chambers([true, false, true, false, false, true]);
        let expected_hits = [true, false, true, false, false, true];

        for (shot, expected_hit) in expected_hits.iter().enumerate() {
            let outcome = cylinder.fire();
            assert_eq!(outcome.hit, *expected_hit, "shot {shot}");
            assert_eq!(outcome.exhausted, shot == 5, "shot {shot}");
        }
        assert_eq!(cylinder.remaining(), 0);
    }

    #[test]
    fn fired_chamber_stays_empty_on_the_next_revolution() {
        let mut cylinder = Cylinder::from_chambers([true, false, false, false, false, true]);

        assert!(cylinder.fire().hit);
        for _ in 0..4 {
            assert!(!cylinder.fire().hit);
        }
        // Chamber 5 is the last live round.
        let outcome = cylinder.fire();
        assert!(outcome.hit);
        assert!(outcome.exhausted);
        // Second revolution: every chamber is spent.
        for _ in 0..CHAMBER_COUNT {
            assert!(!cylinder.fire().hit);
        }
    }

    #[test]
    fn current_is_live_reports_the_chamber_under_the_cursor() {
        let mut cylinder = Cylinder::from_chambers([false, true, false, false, false, false]);
        assert!(!cylinder.current_is_live());
        cylinder.fire();
        assert!(cylinder.current_is_live());
    }
}
