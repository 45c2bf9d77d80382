// food is placed uniformly at random and redrawn while it lands on the avoided cell
// only the head is avoided, so food can still appear under the body
use log::debug;
use num::Integer;
use rand::Rng;

use crate::config::GameConfig;
use crate::snake::Coordinates;

/// Rounds `value` to the nearest multiple of `granularity`, ties going to the even multiple.
pub fn snap(value: i32, granularity: i32) -> i32 {
    let (quotient, remainder) = value.div_mod_floor(&granularity);
    let rounded = match (2 * remainder).cmp(&granularity) {
        std::cmp::Ordering::Less => quotient,
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal => {
            if quotient.is_odd() {
                quotient + 1
            } else {
                quotient
            }
        }
    };
    rounded * granularity
}

// half-open like the classic game's randrange; after snapping it yields the
// same positions as the closed [0, dimension - block], only the edge odds differ
fn draw_axis<R: Rng + ?Sized>(rng: &mut R, dimension: i32, block: i32, granularity: i32) -> i32 {
    snap(rng.random_range(0..dimension - block), granularity)
}

pub fn place<R: Rng + ?Sized>(
    rng: &mut R,
    avoid: Coordinates,
    width: i32,
    height: i32,
    block: i32,
    granularity: i32,
) -> Coordinates {
    let mut attempts = 1;
    loop {
        let food = Coordinates::new(
            draw_axis(rng, width, block, granularity),
            draw_axis(rng, height, block, granularity),
        );
        if food != avoid {
            debug!("food placed at {} after {} draw(s)", food, attempts);
            return food;
        }
        attempts += 1;
    }
}

pub fn place_for<R: Rng + ?Sized>(
    rng: &mut R,
    avoid: Coordinates,
    config: &GameConfig,
) -> Coordinates {
    place(
        rng,
        avoid,
        config.width,
        config.height,
        config.block,
        config.granularity,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const RNG_SEED: u64 = 0x5EED_F00D;

    #[test]
    fn test_snap_rounds_half_to_even() {
        assert_eq!(snap(0, 10), 0);
        assert_eq!(snap(4, 10), 0);
        assert_eq!(snap(5, 10), 0);
        assert_eq!(snap(6, 10), 10);
        assert_eq!(snap(15, 10), 20);
        assert_eq!(snap(25, 10), 20);
        assert_eq!(snap(789, 10), 790);
    }

    #[test]
    fn test_snap_uses_granularity_not_block() {
        assert_eq!(snap(37, 20), 40);
        assert_eq!(snap(29, 20), 20);
        assert_eq!(snap(30, 20), 40);
    }

    #[test]
    fn test_place_never_returns_avoided_cell() {
        let mut rng = StdRng::seed_from_u64(RNG_SEED);
        // a tiny surface makes collisions with the avoided cell frequent
        let avoid = Coordinates::new(0, 0);
        for _ in 0..2000 {
            let food = place(&mut rng, avoid, 30, 30, 10, 10);
            assert_ne!(food, avoid);
        }
    }

    #[test]
    fn test_place_stays_on_surface_and_grid() {
        let mut rng = StdRng::seed_from_u64(RNG_SEED);
        let avoid = Coordinates::new(400, 300);
        for _ in 0..2000 {
            let food = place(&mut rng, avoid, 800, 600, 10, 10);
            assert!(food.x >= 0 && food.x <= 790, "{}", food);
            assert!(food.y >= 0 && food.y <= 590, "{}", food);
            assert_eq!(food.x % 10, 0);
            assert_eq!(food.y % 10, 0);
        }
    }

    #[test]
    fn test_place_for_reads_config() {
        let mut rng = StdRng::seed_from_u64(RNG_SEED);
        let config = GameConfig {
            width: 40,
            height: 20,
            ..GameConfig::default()
        };
        let avoid = Coordinates::new(10, 10);
        for _ in 0..200 {
            let food = place_for(&mut rng, avoid, &config);
            assert!(food.x <= 30 && food.y <= 10);
            assert_ne!(food, avoid);
        }
    }
}
