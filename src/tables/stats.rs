//! Aggregate statistics over a sample set.
//!
//! All means skip values that do not read as numbers. An aggregate over
//! zero numeric observations is `None`, never zero.

use super::grouped::group_by_point;
use crate::core::SampleSet;

pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Mean of a parameter across every row of the set.
pub fn overall_mean(samples: &SampleSet, parameter: &str) -> Option<f64> {
    mean(samples.iter().filter_map(|s| s.number(parameter)))
}

/// Percentage of distinct points whose text value of `parameter` equals
/// `label`. Each point is judged by its first row.
pub fn share_of_points_with(samples: &SampleSet, parameter: &str, label: &str) -> Option<f64> {
    let groups = group_by_point(samples);
    if groups.is_empty() {
        return None;
    }

    let matching = groups
        .iter()
        .filter(|(_, rows)| {
            rows.first()
                .and_then(|row| row.value(parameter).as_text())
                .is_some_and(|text| text.trim() == label)
        })
        .count();

    Some(matching as f64 * 100.0 / groups.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SampleRecord;

    #[test]
    fn mean_of_nothing_is_undefined() {
        assert_eq!(mean(std::iter::empty()), None);
        assert_eq!(mean([1.0, 2.0, 6.0]), Some(3.0));
    }

    #[test]
    fn overall_mean_skips_non_numeric_values() {
        let samples: SampleSet = vec![
            SampleRecord::new("P1", "N/A", "A").with_number("Areia", 40.0),
            SampleRecord::new("P2", "N/A", "A").with_text("Areia", "< LQ"),
            SampleRecord::new("P3", "N/A", "A").with_text("Areia", " 20 "),
            SampleRecord::new("P4", "N/A", "A"),
        ]
        .into_iter()
        .collect();

        assert_eq!(overall_mean(&samples, "Areia"), Some(30.0));
        assert_eq!(overall_mean(&samples, "Silte"), None);
    }

    #[test]
    fn toxicity_share_counts_distinct_points() {
        let samples: SampleSet = vec![
            SampleRecord::new("P1", "N/A", "A").with_text("Toxicidade", "Tóxico"),
            SampleRecord::new("P1", "N/A", "A").with_text("Toxicidade", "Não tóxico"),
            SampleRecord::new("P2", "N/A", "A").with_text("Toxicidade", "Não tóxico"),
            SampleRecord::new("P3", "N/A", "A").with_text("Toxicidade", " Tóxico"),
            SampleRecord::new("P4", "N/A", "A"),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            share_of_points_with(&samples, "Toxicidade", "Tóxico"),
            Some(50.0)
        );
        assert_eq!(
            share_of_points_with(&SampleSet::default(), "Toxicidade", "Tóxico"),
            None
        );
    }
}
