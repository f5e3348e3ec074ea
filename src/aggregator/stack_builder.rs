//! Build a canonical profile from raw stack records.
//!
//! Every record is resolved to a parent-first list of function names and
//! merged with any earlier record on the same path.
//!
//! Example: records `[2 1]` and `[2 1]` with `1 = main`, `2 = work`
//! become one sample `main;work` carrying both records' counts.

use super::profile::Profile;
use crate::parser::RawProfile;
use crate::utils::error::ProfileError;
use log::debug;

/// Aggregate one parsed section into a profile
///
/// **Public** - main entry point for aggregation
///
/// # Errors
/// * `ProfileError::NoSampleNames` / `EmptySampleNames` - bad counter list
/// * `ProfileError::ArityMismatch` - a record's counts do not fit the counters
pub fn aggregate(raw: &RawProfile) -> Result<Profile, ProfileError> {
    debug!(
        "Aggregating {} stack records over {} counter(s)",
        raw.records.len(),
        raw.sample_names.len()
    );

    let mut profile = Profile::new(raw.sample_names.clone())?;
    for record in &raw.records {
        profile.add_sample(record.func_names(&raw.func_names), &record.counts)?;
    }

    debug!("Built {} unique samples", profile.len());
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{FuncId, RawRecord};

    fn raw(records: Vec<RawRecord>) -> RawProfile {
        let mut raw = RawProfile::new(vec!["samples/count".into(), "cpu/nanoseconds".into()]);
        raw.func_names.insert(FuncId(1), "funcName".into());
        raw.records = records;
        raw
    }

    #[test]
    fn test_missing_function_is_placeholder() {
        let profile =
            aggregate(&raw(vec![RawRecord::new(vec![FuncId(1), FuncId(2)], vec![2, 10_000_000])]))
                .unwrap();

        let sample = profile.get("missing-function-2;funcName").unwrap();
        assert_eq!(sample.funcs, vec!["missing-function-2", "funcName"]);
        assert_eq!(sample.counts, vec![2, 10_000_000]);
    }

    #[test]
    fn test_arity_is_rechecked() {
        let err = aggregate(&raw(vec![RawRecord::new(vec![FuncId(1)], vec![1])])).unwrap_err();
        assert_eq!(err, ProfileError::ArityMismatch { got: 1, expected: 2 });
    }

    #[test]
    fn test_rejects_missing_counters() {
        let raw = RawProfile::new(Vec::new());
        assert_eq!(aggregate(&raw).unwrap_err(), ProfileError::NoSampleNames);
    }
}
