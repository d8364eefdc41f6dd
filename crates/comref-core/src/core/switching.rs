/// Weight of a particle at `dist` for a switching region between `core_radius` and `cutoff`.
///
/// Returns 1 inside the core, 0 beyond the cutoff and falls linearly in between.
/// `core_radius < cutoff` is required and is enforced when the configuration is built.
#[inline]
pub fn switching_weight(dist: f64, core_radius: f64, cutoff: f64) -> f64 {
    if dist < core_radius {
        1.0
    } else if dist > cutoff {
        0.0
    } else {
        (dist - cutoff) / (core_radius - cutoff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn weight_is_one_inside_core_radius() {
        assert_eq!(switching_weight(0.0, 1.0, 2.0), 1.0);
        assert_eq!(switching_weight(0.999, 1.0, 2.0), 1.0);
    }

    #[test]
    fn weight_is_zero_beyond_cutoff() {
        assert_eq!(switching_weight(2.001, 1.0, 2.0), 0.0);
        assert_eq!(switching_weight(100.0, 1.0, 2.0), 0.0);
    }

    #[test]
    fn weight_is_continuous_at_both_boundaries() {
        assert!(f64_approx_equal(switching_weight(1.0, 1.0, 2.0), 1.0));
        assert!(f64_approx_equal(switching_weight(2.0, 1.0, 2.0), 0.0));
    }

    #[test]
    fn weight_interpolates_linearly_in_switching_region() {
        assert!(f64_approx_equal(switching_weight(1.5, 1.0, 2.0), 0.5));
        assert!(f64_approx_equal(switching_weight(1.25, 1.0, 2.0), 0.75));
    }

    #[test]
    fn weight_is_monotonically_non_increasing() {
        let mut previous = switching_weight(0.0, 0.8, 1.6);
        for i in 1..=200 {
            let current = switching_weight(i as f64 * 0.01, 0.8, 1.6);
            assert!(current <= previous);
            assert!((0.0..=1.0).contains(&current));
            previous = current;
        }
    }
}
