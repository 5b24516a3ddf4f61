use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::*;

/// Uniform random start cell, then uniform rejection sampling of mine
/// coordinates outside the start zone.
///
/// Each call to [`generate`](LayoutGenerator::generate) reseeds itself from
/// the stream it just used, so a sequence of boards is reproducible from the
/// first seed alone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomLayoutGenerator {
    seed: u64,
}

impl RandomLayoutGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed the next layout will be generated from.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl LayoutGenerator for RandomLayoutGenerator {
    fn generate(&mut self, config: GameConfig) -> MineLayout {
        let side = config.size;
        let mut rng = SmallRng::seed_from_u64(self.seed);

        let start = (rng.random_range(0..side), rng.random_range(0..side));

        let zone_cells = NeighborIter::zone(start, side).count() as CellCount;
        let free_cells = config.total_cells() - zone_cells;
        let target = if config.mines > free_cells {
            log::warn!(
                "Minefield too dense, requested {} mines but only {} cells are free",
                config.mines,
                free_cells
            );
            free_cells
        } else {
            config.mines
        };

        let mut mine_mask: Array2<bool> = Array2::default((side, side).to_nd_index());
        let mut placed: CellCount = 0;
        let mut rejected = 0usize;
        while placed < target {
            let coords = (rng.random_range(0..side), rng.random_range(0..side));
            if in_zone(start, coords) || mine_mask[coords.to_nd_index()] {
                rejected += 1;
                continue;
            }
            mine_mask[coords.to_nd_index()] = true;
            placed += 1;
        }

        self.seed = rng.random();
        log::debug!(
            "Generated {}x{} layout with {} mines, start at {:?}, {} samples rejected",
            side,
            side,
            placed,
            start,
            rejected
        );
        MineLayout::from_mine_mask(mine_mask, start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(size: Coord, mines: CellCount, seed: u64) -> MineLayout {
        let config = GameConfig::new(size, mines).unwrap();
        RandomLayoutGenerator::new(seed).generate(config)
    }

    #[test]
    fn places_exact_mine_count() {
        for level in Level::ALL {
            let config = level.config();
            let layout = generate(config.size, config.mines, 7);
            assert_eq!(layout.mine_count(), config.mines);
            assert_eq!(layout.mines().count(), usize::from(config.mines));
        }
    }

    #[test]
    fn start_zone_is_clear() {
        for seed in 0..50 {
            let layout = generate(8, 10, seed);
            let start = layout.start();
            assert!(NeighborIter::zone(start, 8).all(|coords| !layout.contains_mine(coords)));
            assert_eq!(layout.adjacent_mine_count(start), 0);
        }
    }

    #[test]
    fn densest_board_fills_everything_else() {
        // 16 cells, 6 mines: a corner start leaves 12 free cells, center start 7
        for seed in 0..50 {
            let layout = generate(4, 6, seed);
            assert_eq!(layout.mine_count(), 6);
        }
    }

    #[test]
    fn overfull_config_stops_at_free_cells() {
        // a 3x3 board has no room outside a centered start zone
        let config = GameConfig::new_unchecked(3, 4);
        for seed in 0..64 {
            let layout = RandomLayoutGenerator::new(seed).generate(config);
            let free = 9 - NeighborIter::zone(layout.start(), 3).count() as CellCount;
            assert_eq!(layout.mine_count(), config.mines.min(free));
            assert_eq!(layout.adjacent_mine_count(layout.start()), 0);
        }
    }

    // SmallRng is only value-stable per pointer width
    #[cfg(target_pointer_width = "64")]
    #[test]
    fn seed_42_matches_recorded_layout() {
        let mut generator = RandomLayoutGenerator::new(42);
        let layout = generator.generate(Level::Beginner.config());

        assert_eq!(layout.start(), (6, 2));
        assert_eq!(
            layout.mines().collect::<alloc::collections::BTreeSet<_>>(),
            alloc::collections::BTreeSet::from([
                (1, 0),
                (5, 0),
                (4, 3),
                (1, 4),
                (3, 4),
                (6, 4),
                (7, 5),
                (1, 6),
                (4, 6),
                (1, 7),
            ])
        );
        assert_eq!(generator.seed(), 12037529929179472949);
    }

    #[test]
    fn same_seed_same_layout() {
        assert_eq!(generate(16, 40, 1234), generate(16, 40, 1234));
    }

    #[test]
    fn reseeds_after_each_layout() {
        let config = Level::Beginner.config();
        let mut generator = RandomLayoutGenerator::new(99);
        let first = generator.generate(config);
        let next_seed = generator.seed();
        assert_ne!(next_seed, 99);

        let second = generator.generate(config);
        assert_eq!(second, RandomLayoutGenerator::new(next_seed).generate(config));
        assert_ne!(first, second);
    }
}
