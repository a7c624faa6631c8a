use icu_model::{PhenotypeBucket, SeverityGroupMap};

/// Merge the APACHE II and APACHE IV groups of a patient into one bucket.
///
/// APACHE II wins whenever its score maps to a bucket; APACHE IV is only
/// consulted when it does not. Neither mapping yields unknown.
pub fn merge_severity_groups(
    apache_ii: Option<f64>,
    apache_iv: Option<f64>,
    apache_ii_map: &SeverityGroupMap,
    apache_iv_map: &SeverityGroupMap,
) -> Option<PhenotypeBucket> {
    apache_ii_map
        .bucket_for(apache_ii)
        .or_else(|| apache_iv_map.bucket_for(apache_iv))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn maps() -> (SeverityGroupMap, SeverityGroupMap) {
        let ii = [(98, PhenotypeBucket(1)), (105, PhenotypeBucket(4))]
            .into_iter()
            .collect();
        let iv = [(1201, PhenotypeBucket(4)), (1305, PhenotypeBucket(6))]
            .into_iter()
            .collect();
        (ii, iv)
    }

    #[test]
    fn agreeing_groups() {
        let (ii, iv) = maps();
        assert_eq!(
            merge_severity_groups(Some(105.0), Some(1201.0), &ii, &iv),
            Some(PhenotypeBucket(4))
        );
    }

    #[test]
    fn falls_back_to_defined_group() {
        let (ii, iv) = maps();
        assert_eq!(
            merge_severity_groups(None, Some(1305.0), &ii, &iv),
            Some(PhenotypeBucket(6))
        );
        assert_eq!(
            merge_severity_groups(Some(98.0), Some(f64::NAN), &ii, &iv),
            Some(PhenotypeBucket(1))
        );
        // unmapped APACHE II code defers to APACHE IV
        assert_eq!(
            merge_severity_groups(Some(7.0), Some(1201.0), &ii, &iv),
            Some(PhenotypeBucket(4))
        );
    }

    #[test]
    fn disagreement_prefers_apache_ii() {
        let (ii, iv) = maps();
        assert_eq!(
            merge_severity_groups(Some(98.0), Some(1305.0), &ii, &iv),
            Some(PhenotypeBucket(1))
        );
    }

    #[test]
    fn both_undefined() {
        let (ii, iv) = maps();
        assert_eq!(merge_severity_groups(None, None, &ii, &iv), None);
        assert_eq!(merge_severity_groups(Some(1.0), Some(2.0), &ii, &iv), None);
    }
}
