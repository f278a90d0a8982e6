pub struct StatsHelper;

impl StatsHelper {
    /// Arithmetic mean, `None` for an empty sequence.
    pub fn mean<I>(samples: I) -> Option<f64>
    where
        I: IntoIterator<Item = f64>,
    {
        let (sum, count) = samples
            .into_iter()
            .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
        if count == 0 {
            return None;
        }
        Some(sum / count as f64)
    }

    pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
        value.max(min).min(max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_sequence_is_none() {
        assert_eq!(StatsHelper::mean(Vec::new()), None);
    }

    #[test]
    fn mean_handles_single_value() {
        assert_eq!(StatsHelper::mean([4.0]), Some(4.0));
    }

    #[test]
    fn mean_of_three_values() {
        assert_eq!(StatsHelper::mean([10.0, 20.0, 30.0]), Some(20.0));
    }

    #[test]
    fn clamp_bounds_both_sides() {
        assert_eq!(StatsHelper::clamp(-3.0, 0.0, 1.0), 0.0);
        assert_eq!(StatsHelper::clamp(3.0, 0.0, 1.0), 1.0);
        assert_eq!(StatsHelper::clamp(0.5, 0.0, 1.0), 0.5);
    }
}
