/// Degree arithmetic on the compass circle.
pub struct AngleHelper;

impl AngleHelper {
    /// Maps any finite angle into `[0, 360)`.
    pub fn normalize_deg(angle: f64) -> f64 {
        let wrapped = angle.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360 for tiny negative inputs.
        if wrapped >= 360.0 {
            0.0
        } else {
            wrapped
        }
    }

    /// Signed rotation in `(-180, 180]` taking `from` onto `to` the short way.
    pub fn shortest_delta(from: f64, to: f64) -> f64 {
        let mut delta = Self::normalize_deg(to) - Self::normalize_deg(from);
        if delta > 180.0 {
            delta -= 360.0;
        } else if delta <= -180.0 {
            delta += 360.0;
        }
        delta
    }

    /// Vector mean of unit-circle positions, normalized back to degrees.
    pub fn circular_mean<I>(samples: I) -> Option<f64>
    where
        I: IntoIterator<Item = f64>,
    {
        let (sx, sy, count) = samples
            .into_iter()
            .fold((0.0, 0.0, 0usize), |(sx, sy, count), deg| {
                let rad = deg.to_radians();
                (sx + rad.cos(), sy + rad.sin(), count + 1)
            });
        if count == 0 {
            return None;
        }
        Some(Self::normalize_deg(sy.atan2(sx).to_degrees()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn circular_close(a: f64, b: f64, tol: f64) -> bool {
        AngleHelper::shortest_delta(a, b).abs() < tol
    }

    #[test]
    fn normalize_wraps_negative_and_large_angles() {
        assert!((AngleHelper::normalize_deg(-90.0) - 270.0).abs() < EPS);
        assert!((AngleHelper::normalize_deg(720.0 + 45.0) - 45.0).abs() < EPS);
        assert_eq!(AngleHelper::normalize_deg(360.0), 0.0);
        let tiny = AngleHelper::normalize_deg(-1e-20);
        assert!((0.0..360.0).contains(&tiny));
    }

    #[test]
    fn shortest_delta_crosses_north() {
        assert!((AngleHelper::shortest_delta(350.0, 10.0) - 20.0).abs() < EPS);
        assert!((AngleHelper::shortest_delta(10.0, 350.0) + 20.0).abs() < EPS);
    }

    #[test]
    fn shortest_delta_half_turn_is_positive() {
        assert_eq!(AngleHelper::shortest_delta(0.0, 180.0), 180.0);
        assert_eq!(AngleHelper::shortest_delta(180.0, 0.0), 180.0);
    }

    #[test]
    fn shortest_delta_stays_in_range_and_lands_on_target() {
        let mut a = -725.0;
        while a < 725.0 {
            let mut b = -400.0;
            while b < 400.0 {
                let d = AngleHelper::shortest_delta(a, b);
                assert!(d > -180.0 && d <= 180.0, "delta {d} for {a} -> {b}");
                let landed = AngleHelper::normalize_deg(a + d);
                assert!(
                    circular_close(landed, b, 1e-6),
                    "{a} + {d} = {landed}, expected {b}"
                );
                b += 13.7;
            }
            a += 17.3;
        }
    }

    #[test]
    fn circular_mean_across_north_is_zero() {
        let mean = AngleHelper::circular_mean([359.0, 1.0]).unwrap();
        assert!(circular_close(mean, 0.0, 1e-6), "mean was {mean}");
    }

    #[test]
    fn circular_mean_of_nothing_is_none() {
        assert_eq!(AngleHelper::circular_mean(Vec::new()), None);
    }

    #[test]
    fn circular_mean_of_quadrant() {
        let mean = AngleHelper::circular_mean([80.0, 100.0]).unwrap();
        assert!((mean - 90.0).abs() < 1e-6);
    }
}
