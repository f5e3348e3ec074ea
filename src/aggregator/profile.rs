//! Aggregated profile: unique call paths with one count per counter.

use crate::utils::config::FRAME_SEPARATOR;
use crate::utils::error::ProfileError;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// One unique call path and its summed counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// Function names, parent first
    pub funcs: Vec<String>,

    /// One value per counter name of the owning profile
    pub counts: Vec<i64>,
}

impl Sample {
    pub fn new(funcs: Vec<String>, counts: Vec<i64>) -> Self {
        Self { funcs, counts }
    }

    /// Identity of the sample: its frames joined by `;`
    pub fn key(&self) -> String {
        self.funcs.join(FRAME_SEPARATOR)
    }

    /// Add counts component-wise
    ///
    /// Counts are left untouched when any component would overflow.
    pub fn add(&mut self, counts: &[i64]) -> Result<(), ProfileError> {
        if counts.len() != self.counts.len() {
            return Err(ProfileError::ArityMismatch {
                got: counts.len(),
                expected: self.counts.len(),
            });
        }
        let summed = self
            .counts
            .iter()
            .zip(counts)
            .map(|(total, count)| total.checked_add(*count))
            .collect::<Option<Vec<i64>>>()
            .ok_or_else(|| ProfileError::CountOverflow(self.key()))?;
        self.counts = summed;
        Ok(())
    }
}

/// Set of unique samples sharing one list of counter names
///
/// Samples are keyed by path identity; iteration order is unspecified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    sample_names: Vec<String>,
    samples: HashMap<String, Sample>,
}

impl Profile {
    /// Create an empty profile
    ///
    /// # Errors
    /// * `ProfileError::NoSampleNames` - no counters declared
    /// * `ProfileError::EmptySampleNames` - a counter name is empty
    pub fn new(sample_names: Vec<String>) -> Result<Self, ProfileError> {
        validate_sample_names(&sample_names)?;
        Ok(Self {
            sample_names,
            samples: HashMap::new(),
        })
    }

    /// Build a profile from samples, merging equal paths
    pub fn from_samples(
        sample_names: Vec<String>,
        samples: impl IntoIterator<Item = Sample>,
    ) -> Result<Self, ProfileError> {
        let mut profile = Self::new(sample_names)?;
        for sample in samples {
            profile.add_sample(sample.funcs, &sample.counts)?;
        }
        Ok(profile)
    }

    /// Merge one stack into the profile
    pub(crate) fn add_sample(
        &mut self,
        funcs: Vec<String>,
        counts: &[i64],
    ) -> Result<(), ProfileError> {
        if counts.len() != self.sample_names.len() {
            return Err(ProfileError::ArityMismatch {
                got: counts.len(),
                expected: self.sample_names.len(),
            });
        }

        match self.samples.entry(funcs.join(FRAME_SEPARATOR)) {
            Entry::Occupied(mut entry) => entry.get_mut().add(counts),
            Entry::Vacant(entry) => {
                entry.insert(Sample::new(funcs, counts.to_vec()));
                Ok(())
            }
        }
    }

    pub fn sample_names(&self) -> &[String] {
        &self.sample_names
    }

    /// Position of the counter called `name`
    pub fn counter_index(&self, name: &str) -> Option<usize> {
        self.sample_names.iter().position(|n| n == name)
    }

    pub fn samples(&self) -> impl Iterator<Item = &Sample> {
        self.samples.values()
    }

    /// Look up a sample by its `;`-joined path
    pub fn get(&self, path: &str) -> Option<&Sample> {
        self.samples.get(path)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Reject an empty counter list or any empty counter name
pub fn validate_sample_names(names: &[String]) -> Result<(), ProfileError> {
    if names.is_empty() {
        return Err(ProfileError::NoSampleNames);
    }
    if names.iter().any(|name| name.is_empty()) {
        return Err(ProfileError::EmptySampleNames);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_profile() {
        assert!(Profile::new(names(&["samples/count", "cpu/nanoseconds"])).is_ok());
        assert_eq!(
            Profile::new(Vec::new()).unwrap_err(),
            ProfileError::NoSampleNames
        );
        assert_eq!(
            Profile::new(names(&["samples/count", "", "cpu/nanoseconds"])).unwrap_err(),
            ProfileError::EmptySampleNames
        );
    }

    #[test]
    fn test_sample_add() {
        let mut sample = Sample::new(names(&["a", "b"]), vec![1, 2]);
        sample.add(&[3, 4]).unwrap();
        assert_eq!(sample.counts, vec![4, 6]);

        assert!(sample.add(&[5]).is_err(), "should fail when counts mismatch");
        assert_eq!(sample.counts, vec![4, 6]);
    }

    #[test]
    fn test_sample_add_overflow() {
        let mut sample = Sample::new(names(&["main", "alloc"]), vec![1, i64::MAX]);
        assert_eq!(
            sample.add(&[1, 1]).unwrap_err(),
            ProfileError::CountOverflow("main;alloc".into())
        );
        assert_eq!(sample.counts, vec![1, i64::MAX]);

        let err = Profile::from_samples(
            names(&["samples/count"]),
            vec![
                Sample::new(names(&["main"]), vec![i64::MAX]),
                Sample::new(names(&["main"]), vec![1]),
            ],
        )
        .unwrap_err();
        assert_eq!(err, ProfileError::CountOverflow("main".into()));
    }

    #[test]
    fn test_from_samples_merges_paths() {
        let profile = Profile::from_samples(
            names(&["samples/count"]),
            vec![
                Sample::new(names(&["main", "work"]), vec![1]),
                Sample::new(names(&["main"]), vec![7]),
                Sample::new(names(&["main", "work"]), vec![2]),
            ],
        )
        .unwrap();

        assert_eq!(profile.len(), 2);
        assert_eq!(profile.get("main;work").unwrap().counts, vec![3]);
        assert_eq!(profile.counter_index("samples/count"), Some(0));
        assert_eq!(profile.counter_index("cpu/nanoseconds"), None);
    }
}
