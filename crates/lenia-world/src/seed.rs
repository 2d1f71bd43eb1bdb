//! Initial field patterns.

use crate::field::Field;
use lenia_core::{wrap_index, Bounds, SeedPattern};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Clear `field` to the lower bound and paint `pattern` onto it.
///
/// Random patterns draw from `rng`; the others ignore it.
pub fn apply(field: &mut Field, pattern: &SeedPattern, bounds: Bounds, rng: &mut ChaCha8Rng) {
    field.fill(bounds.lower);

    match *pattern {
        SeedPattern::Empty => {}
        SeedPattern::Disc { radius, value } => paint_disc(field, radius, value),
        SeedPattern::SoftBlob { size } => paint_soft_blob(field, size),
        SeedPattern::Bubbles {
            min_count,
            max_count,
            min_radius,
            max_radius,
        } => paint_bubbles(field, min_count, max_count, min_radius, max_radius, rng),
    }

    field.clamp_to(bounds);
}

/// Filled disc at `(width / 2, height / 2)`, strict `r < radius`
fn paint_disc(field: &mut Field, radius: f32, value: f32) {
    let width = field.width();
    let cx = width as f32 / 2.0;
    let cy = field.height() as f32 / 2.0;

    for (i, cell) in field.cells_mut().iter_mut().enumerate() {
        let dx = (i % width) as f32 - cx;
        let dy = (i / width) as f32 - cy;
        if (dx * dx + dy * dy).sqrt() < radius {
            *cell = value;
        }
    }
}

/// Soft radial blob with a slight sinusoidal ripple, centred on the grid
fn paint_soft_blob(field: &mut Field, size: usize) {
    let half = size as f32 / 2.0;
    let origin_x = (field.width() / 2) as isize - (size / 2) as isize;
    let origin_y = (field.height() / 2) as isize - (size / 2) as isize;
    let (width, height) = (field.width(), field.height());

    for py in 0..size {
        for px in 0..size {
            let dx = px as f32 - half + 0.5;
            let dy = py as f32 - half + 0.5;
            let dist = (dx * dx + dy * dy).sqrt() / half;

            let value = if dist < 0.9 {
                (0.9 - dist) / 0.9 * (1.0 - 0.3 * (dx * 0.5).sin() * (dy * 0.5).sin())
            } else {
                0.0
            };

            let x = wrap_index(origin_x + px as isize, width);
            let y = wrap_index(origin_y + py as isize, height);
            field.cells_mut()[y * width + x] = value;
        }
    }
}

/// Bubbles fading linearly from their centre, overlapping by maximum
fn paint_bubbles(
    field: &mut Field,
    min_count: usize,
    max_count: usize,
    min_radius: f32,
    max_radius: f32,
    rng: &mut ChaCha8Rng,
) {
    let (width, height) = (field.width(), field.height());
    let count = rng.gen_range(min_count..=max_count);

    for _ in 0..count {
        let bx = rng.gen_range(0..width) as isize;
        let by = rng.gen_range(0..height) as isize;
        let radius = if min_radius < max_radius {
            rng.gen_range(min_radius..max_radius)
        } else {
            min_radius
        };
        let reach = radius as isize;

        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let d = ((dx * dx + dy * dy) as f32).sqrt();
                if d > radius {
                    continue;
                }
                let x = wrap_index(bx + dx, width);
                let y = wrap_index(by + dy, height);
                let value = (1.0 - d / radius) * (0.5 + 0.5 * rng.gen::<f32>());
                let cell = &mut field.cells_mut()[y * width + x];
                *cell = cell.max(value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lenia_core::Position;
    use rand::SeedableRng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn test_empty_seed() {
        let mut field = Field::new(8, 8);
        field.fill(0.4);
        apply(&mut field, &SeedPattern::Empty, Bounds::default(), &mut rng());
        assert!(field.cells().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_disc_seed() {
        let mut field = Field::new(64, 36);
        apply(&mut field, &SeedPattern::default(), Bounds::default(), &mut rng());

        assert_eq!(field.value_at(32, 18), 0.8);
        // 15 cells out is inside, 16 is on the boundary and excluded
        assert_eq!(field.value_at(47, 18), 0.8);
        assert_eq!(field.value_at(48, 18), 0.0);
        assert_eq!(field.value_at(0, 0), 0.0);
    }

    #[test]
    fn test_disc_respects_bounds() {
        let mut field = Field::new(16, 16);
        let seed = SeedPattern::Disc { radius: 4.0, value: 1.0 };
        apply(&mut field, &seed, Bounds::headroom(), &mut rng());
        assert_eq!(field.value_at(8, 8), 0.95);
    }

    #[test]
    fn test_soft_blob_seed() {
        let mut field = Field::new(40, 40);
        apply(&mut field, &SeedPattern::SoftBlob { size: 20 }, Bounds::default(), &mut rng());

        let stats = field.stats(0.1);
        assert!(stats.mass > 0.0);
        assert!(stats.max <= 1.0);
        // Corners of the blob square fall outside d < 0.9
        assert_eq!(field.get(Position::new(10, 10)), 0.0);
        assert!(field.get(Position::new(20, 20)) > 0.5);
    }

    #[test]
    fn test_soft_blob_wraps_on_small_grid() {
        let mut field = Field::new(8, 8);
        apply(&mut field, &SeedPattern::SoftBlob { size: 20 }, Bounds::default(), &mut rng());
        assert!(field.cells().iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_bubbles_deterministic_per_seed() {
        let seed = SeedPattern::Bubbles {
            min_count: 5,
            max_count: 15,
            min_radius: 5.0,
            max_radius: 20.0,
        };
        let mut a = Field::new(50, 50);
        let mut b = Field::new(50, 50);
        apply(&mut a, &seed, Bounds::default(), &mut rng());
        apply(&mut b, &seed, Bounds::default(), &mut rng());

        assert_eq!(a, b);
        assert!(a.stats(0.1).mass > 0.0);
        assert!(a.cells().iter().all(|&v| (0.0..=1.0).contains(&v)));
    }
}
