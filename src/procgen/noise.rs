/// One-dimensional value noise for terrain shaping
use rand::Rng;
use std::f64::consts::PI;

/// Number of lattice samples in the noise table. Noise repeats with this period.
pub const NOISE_TABLE_LEN: usize = 1000;

/// Table of uniform random samples with cosine-smoothed fractal lookup
///
/// This is value noise: each integer lattice point holds an independent
/// sample, and values between lattice points are blended with a cosine
/// curve. The table is filled once at construction and never changes, so
/// a single field can be shared read-only between generators.
#[derive(Debug, Clone)]
pub struct NoiseField {
    samples: Vec<f64>,
}

impl NoiseField {
    /// Fill a new table with independent draws in [0, 1) from `rng`
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let samples = (0..NOISE_TABLE_LEN).map(|_| rng.gen::<f64>()).collect();
        Self { samples }
    }

    /// Length of the lattice, i.e. the period of the noise
    pub fn period(&self) -> usize {
        self.samples.len()
    }

    /// Raw lattice value at `index`
    ///
    /// Indices wrap through `|index| mod period`, so every integer is valid
    /// and the noise tiles forever. Note the absolute value mirrors negative
    /// indices onto positive ones.
    pub fn smooth_noise(&self, index: i64) -> f64 {
        let wrapped = index.unsigned_abs() % self.samples.len() as u64;
        self.samples[wrapped as usize]
    }

    /// Cosine-interpolated noise between the two lattice points around `x`
    pub fn interpolated_noise(&self, x: f64) -> f64 {
        let floor = x.floor();
        let index = floor as i64;

        let v1 = self.smooth_noise(index);
        let v2 = self.smooth_noise(index.wrapping_add(1));

        cosine_interpolate(v1, v2, x - floor)
    }

    /// Multi-octave sum of interpolated noise, normalized by total amplitude
    ///
    /// Frequency starts at 1 and doubles every octave; amplitude starts at 1
    /// and is multiplied by `persistence` every octave. Dividing by the sum
    /// of amplitudes keeps the result in the same [0, 1) range as the table.
    ///
    /// # Arguments
    /// * `x` - Sample coordinate
    /// * `persistence` - Amplitude falloff per octave
    /// * `octaves` - Number of octaves to sum (0 yields 0.0)
    pub fn fractal_noise(&self, x: f64, persistence: f64, octaves: u32) -> f64 {
        let mut total = 0.0;
        let mut frequency = 1.0;
        let mut amplitude = 1.0;
        let mut max_value = 0.0;

        for _ in 0..octaves {
            total += self.interpolated_noise(x * frequency) * amplitude;
            max_value += amplitude;
            amplitude *= persistence;
            frequency *= 2.0;
        }

        if max_value == 0.0 {
            return 0.0;
        }

        total / max_value
    }
}

/// Blend `a` toward `b` along a half cosine wave
fn cosine_interpolate(a: f64, b: f64, t: f64) -> f64 {
    let f = (1.0 - (t * PI).cos()) * 0.5;
    a * (1.0 - f) + b * f
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn field(seed: u64) -> NoiseField {
        NoiseField::new(&mut ChaCha8Rng::seed_from_u64(seed))
    }

    #[test]
    fn test_table_has_fixed_length() {
        let noise = field(1);
        assert_eq!(noise.period(), NOISE_TABLE_LEN);
        assert!(noise.samples.iter().all(|v| (0.0..1.0).contains(v)));
    }

    #[test]
    fn test_same_seed_same_table() {
        let a = field(12345);
        let b = field(12345);
        assert_eq!(a.samples, b.samples);

        let c = field(54321);
        assert_ne!(a.samples, c.samples);
    }

    #[test]
    fn test_interpolation_hits_lattice_points() {
        let noise = field(7);
        for i in 0..20 {
            let at_lattice = noise.interpolated_noise(i as f64);
            assert_eq!(at_lattice, noise.smooth_noise(i));
        }
    }

    #[test]
    fn test_interpolation_midpoint_is_average() {
        let noise = field(7);
        let mid = noise.interpolated_noise(3.5);
        let expected = (noise.smooth_noise(3) + noise.smooth_noise(4)) / 2.0;
        assert!((mid - expected).abs() < 1e-12, "midpoint {} != {}", mid, expected);
    }

    #[test]
    fn test_negative_indices_mirror() {
        let noise = field(9);
        assert_eq!(noise.smooth_noise(-5), noise.smooth_noise(5));
        // unsigned_abs keeps the most negative index in range
        let _ = noise.smooth_noise(i64::MIN);
    }

    #[test]
    fn test_single_octave_equals_interpolated() {
        let noise = field(3);
        for i in 0..50 {
            let x = i as f64 * 0.37;
            assert_eq!(noise.fractal_noise(x, 0.5, 1), noise.interpolated_noise(x));
        }
    }

    #[test]
    fn test_zero_octaves_is_zero() {
        let noise = field(3);
        assert_eq!(noise.fractal_noise(12.5, 0.6, 0), 0.0);
    }

    #[test]
    fn test_continuous_across_integer_boundaries() {
        let noise = field(11);
        for n in -50..50 {
            let x = n as f64;
            let before = noise.fractal_noise(x - 1e-9, 0.6, 4);
            let after = noise.fractal_noise(x, 0.6, 4);
            assert!(
                (before - after).abs() < 1e-6,
                "discontinuity at {}: {} vs {}",
                x,
                before,
                after
            );
        }
    }

    proptest! {
        #[test]
        fn prop_fractal_noise_in_unit_range(
            x in -1.0e5f64..1.0e5,
            persistence in 0.01f64..=1.0,
            octaves in 1u32..8,
        ) {
            let noise = field(42);
            let v = noise.fractal_noise(x, persistence, octaves);
            prop_assert!((0.0..=1.0).contains(&v), "value {} out of range", v);
        }

        #[test]
        fn prop_fractal_noise_continuous(x in -1.0e4f64..1.0e4, octaves in 1u32..6) {
            let noise = field(42);
            let a = noise.fractal_noise(x, 0.6, octaves);
            let b = noise.fractal_noise(x + 1e-7, 0.6, octaves);
            prop_assert!((a - b).abs() < 1e-4, "jump of {} at {}", (a - b).abs(), x);
        }

        #[test]
        fn prop_smooth_noise_periodic(i in 0i64..1_000_000_000) {
            let noise = field(42);
            prop_assert_eq!(
                noise.smooth_noise(i),
                noise.smooth_noise(i + NOISE_TABLE_LEN as i64)
            );
        }
    }
}
