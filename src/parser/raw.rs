//! State-machine parser for the profiler's `-raw` text dump.
//!
//! A dump looks like:
//!
//! ```text
//! PeriodType: cpu nanoseconds
//! Samples:
//! samples/count cpu/nanoseconds
//!           1   10000000: 1 2 3
//! Locations
//!      1: 0x4a3b5c M=1 main.fib /src/fib.go:10 s=0
//! Mappings
//! 1: 0x400000/0x4c0000/0x0 /bin/fib
//! ```
//!
//! Each line is trimmed and fed to the current [`ReadState`]. The first bad
//! line aborts the whole parse.

use super::schema::{FuncId, RawProfile, RawRecord, ReadState};
use crate::aggregator::profile::validate_sample_names;
use crate::aggregator::{aggregate, Profile};
use crate::utils::config::{
    HEAP_ANNOTATION_MARKER, LOCATIONS_MARKER, MAPPINGS_MARKER, MAPPING_TOKEN_PREFIX, SAMPLES_MARKER,
};
use crate::utils::error::{ParseError, ProfileError};
use log::{debug, warn};
use std::num::ParseIntError;
use std::str::FromStr;

/// Line-by-line parser over one raw dump
///
/// Holds all state for a single parse; build a fresh one per input.
#[derive(Debug)]
pub struct RawParser {
    state: ReadState,
    current: RawProfile,
    sections: Vec<RawProfile>,
}

impl Default for RawParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RawParser {
    pub fn new() -> Self {
        Self {
            state: ReadState::Ignore,
            current: RawProfile::default(),
            sections: Vec::new(),
        }
    }

    /// Parse a complete dump into its `Samples` sections
    ///
    /// **Public** - main entry point for the raw grammar
    ///
    /// # Errors
    /// * `ParseError::MalformedSample` / `MalformedLocation` - grammar violation
    /// * `ParseError::InvalidInteger` - count or function id is not an integer
    /// * `ParseError::Semantic` - counter names empty or count arity mismatch
    /// * `ParseError::Incomplete` - input ended before the location region
    pub fn parse(mut self, input: &[u8]) -> Result<Vec<RawProfile>, ParseError> {
        let text = std::str::from_utf8(input)?;

        for line in text.lines() {
            self.process_line(line.trim())?;
        }

        if self.state < ReadState::Locations {
            return Err(ParseError::Incomplete(self.state));
        }
        self.finish_section();

        debug!("Parsed {} sample section(s)", self.sections.len());
        Ok(self.sections)
    }

    fn process_line(&mut self, line: &str) -> Result<(), ParseError> {
        match self.state {
            ReadState::Ignore => {
                if line.starts_with(SAMPLES_MARKER) {
                    self.state = ReadState::SamplesHeader;
                }
            }
            ReadState::SamplesHeader => {
                self.current = RawProfile::new(parse_sample_names(line)?);
                self.state = ReadState::Samples;
            }
            ReadState::Samples => {
                if line.starts_with(LOCATIONS_MARKER) {
                    self.state = ReadState::Locations;
                } else {
                    self.add_sample(line)?;
                }
            }
            ReadState::Locations => {
                if line.starts_with(MAPPINGS_MARKER) {
                    self.state = ReadState::Mappings;
                } else if line.starts_with(SAMPLES_MARKER) {
                    self.start_section();
                } else {
                    self.add_location(line)?;
                }
            }
            ReadState::Mappings => {
                if line.starts_with(SAMPLES_MARKER) {
                    self.start_section();
                }
            }
        }
        Ok(())
    }

    /// Close the section in progress and expect a new header line
    fn start_section(&mut self) {
        self.finish_section();
        self.state = ReadState::SamplesHeader;
    }

    fn finish_section(&mut self) {
        let section = std::mem::take(&mut self.current);
        debug!(
            "Finished section: {} records, {} functions",
            section.records.len(),
            section.func_names.len()
        );
        self.sections.push(section);
    }

    /// Parse `<count> [<count>...]: <funcid> [<funcid>...]`
    fn add_sample(&mut self, line: &str) -> Result<(), ParseError> {
        if line.contains(HEAP_ANNOTATION_MARKER) {
            return Ok(());
        }

        let (counts_part, stack_part) = line
            .rsplit_once(':')
            .ok_or_else(|| ParseError::MalformedSample(line.to_string()))?;

        let counts = counts_part
            .split_whitespace()
            .map(parse_int::<i64>)
            .collect::<Result<Vec<_>, _>>()?;

        let expected = self.current.sample_names.len();
        if counts.len() != expected {
            return Err(ProfileError::ArityMismatch {
                got: counts.len(),
                expected,
            }
            .into());
        }

        let stack = stack_part
            .split_whitespace()
            .map(|s| parse_int::<u64>(s).map(FuncId))
            .collect::<Result<Vec<_>, _>>()?;
        if stack.is_empty() {
            return Err(ParseError::MalformedSample(line.to_string()));
        }

        self.current.records.push(RawRecord::new(stack, counts));
        Ok(())
    }

    /// Parse `<funcid>: <address> [M=<n>] <name> ...`
    fn add_location(&mut self, line: &str) -> Result<(), ParseError> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 {
            return Err(ParseError::MalformedLocation(line.to_string()));
        }

        let id = FuncId(parse_int(parts[0].trim_end_matches(':'))?);
        let name_index = match parts.get(2) {
            Some(token) if token.starts_with(MAPPING_TOKEN_PREFIX) => 3,
            _ => 2,
        };

        // An address without a name contributes no mapping
        if let Some(name) = parts.get(name_index) {
            self.current.func_names.insert(id, (*name).to_string());
        }
        Ok(())
    }
}

/// Split the header line into counter names
///
/// Splits on every whitespace character so doubled separators surface as
/// empty names instead of being swallowed.
fn parse_sample_names(line: &str) -> Result<Vec<String>, ProfileError> {
    let names: Vec<String> = line.split(char::is_whitespace).map(str::to_string).collect();
    validate_sample_names(&names)?;
    Ok(names)
}

fn parse_int<T>(s: &str) -> Result<T, ParseError>
where
    T: FromStr<Err = ParseIntError>,
{
    s.parse::<T>().map_err(|source| ParseError::InvalidInteger {
        input: s.to_string(),
        source,
    })
}

/// Parse raw dump bytes into their sections without aggregating
pub fn parse_raw_sections(input: &[u8]) -> Result<Vec<RawProfile>, ParseError> {
    RawParser::new().parse(input)
}

/// Parse a raw dump and aggregate its first section into a profile
///
/// **Public** - the usual entry point; later sections are ignored
pub fn parse_raw(input: &[u8]) -> Result<Profile, ParseError> {
    let sections = parse_raw_sections(input)?;
    if sections.len() > 1 {
        warn!(
            "Dump holds {} sections, folding only the first and dropping {}",
            sections.len(),
            sections.len() - 1
        );
    }
    let first = sections
        .into_iter()
        .next()
        .ok_or(ParseError::Incomplete(ReadState::Ignore))?;
    Ok(aggregate(&first)?)
}

/// Parse a raw dump and aggregate every section independently
pub fn parse_raw_profiles(input: &[u8]) -> Result<Vec<Profile>, ParseError> {
    parse_raw_sections(input)?
        .iter()
        .map(|section| aggregate(section).map_err(ParseError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ErrorKind;

    const SIMPLE: &str = "
Samples:
samples/count cpu/nanoseconds
   2   10000000: 4 5 6
Locations:
   3: 0xaaaaa funcName :0 s=0
";

    fn parse_err(contents: &str) -> ParseError {
        parse_raw_sections(contents.as_bytes()).unwrap_err()
    }

    #[test]
    fn test_parse_simple() {
        let sections = parse_raw_sections(SIMPLE.as_bytes()).unwrap();
        assert_eq!(sections.len(), 1);

        let section = &sections[0];
        assert_eq!(section.sample_names, vec!["samples/count", "cpu/nanoseconds"]);
        assert_eq!(
            section.records,
            vec![RawRecord::new(
                vec![FuncId(4), FuncId(5), FuncId(6)],
                vec![2, 10_000_000]
            )]
        );
        assert_eq!(section.func_names.get(&FuncId(3)).unwrap(), "funcName");
    }

    #[test]
    fn test_mapping_token_shifts_name() {
        let contents = "Samples:
samples/count
1: 1
Locations
     1: 0x4a3b5c M=1 main.fib /src/fib.go:10 s=0
     2: 0x4a3b60
";
        let sections = parse_raw_sections(contents.as_bytes()).unwrap();
        let names = &sections[0].func_names;
        assert_eq!(names.get(&FuncId(1)).unwrap(), "main.fib");
        assert!(names.get(&FuncId(2)).is_none());
    }

    #[test]
    fn test_heap_annotation_is_skipped() {
        let contents = "Samples:
alloc_objects/count alloc_space/bytes
   1 4096: 1
                bytes:[4096]
Locations
     1: 0x1 main.alloc
";
        let sections = parse_raw_sections(contents.as_bytes()).unwrap();
        assert_eq!(sections[0].records.len(), 1);
    }

    #[test]
    fn test_bad_count_is_malformed() {
        let err = parse_err(&SIMPLE.replace("10000000", "??"));
        assert!(matches!(err, ParseError::InvalidInteger { ref input, .. } if input == "??"));
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_first_error_wins() {
        let contents = SIMPLE.replace("   2 ", "?s? ").replace("10000000", "?t?");
        let err = parse_err(&contents);
        assert!(err.to_string().contains("\"?s?\""), "got {}", err);
    }

    #[test]
    fn test_sample_without_colon() {
        let contents = "Samples:
samples/count cpu/nanoseconds
   1
Locations:
   3: 0xaaaaa funcName :0 s=0
";
        assert!(matches!(parse_err(contents), ParseError::MalformedSample(_)));
    }

    #[test]
    fn test_location_with_single_field() {
        let contents = "Samples:
samples/count cpu/nanoseconds
   1 10000: 2
Locations:
   3
";
        assert!(matches!(parse_err(contents), ParseError::MalformedLocation(_)));
    }

    #[test]
    fn test_incomplete_reports_state() {
        let contents = "Samples:
samples/count cpu/nanoseconds
   1 10000: 2
";
        let err = parse_err(contents);
        assert!(matches!(err, ParseError::Incomplete(ReadState::Samples)));
        assert_eq!(
            err.to_string(),
            "parser ended before processing locations, state: samples"
        );
    }

    #[test]
    fn test_sections_are_independent() {
        let contents = "Samples:
samples/count
1: 1
Locations
     1: 0x1 first.fn
Mappings
1: 0x400000/0x4c0000/0x0 /bin/a
Samples:
alloc_objects/count alloc_space/bytes
3 96: 1
Locations
     1: 0x2 second.fn
";
        let sections = parse_raw_sections(contents.as_bytes()).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].func_names.get(&FuncId(1)).unwrap(), "first.fn");
        assert_eq!(sections[1].func_names.get(&FuncId(1)).unwrap(), "second.fn");
        assert_eq!(sections[1].sample_names.len(), 2);
    }

    #[test]
    fn test_parse_raw_profiles_aggregates_each_section() {
        let contents = "Samples:
samples/count
1: 1
1: 1
Locations
     1: 0x1 first.fn
Samples:
samples/count
5: 1
Locations
     1: 0x2 second.fn
";
        let profiles = parse_raw_profiles(contents.as_bytes()).unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].get("first.fn").unwrap().counts, vec![2]);
        assert_eq!(profiles[1].get("second.fn").unwrap().counts, vec![5]);
    }
}
