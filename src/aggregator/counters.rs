//! Pick which counter of a profile feeds the folded output.
//!
//! Mirrors the profiler's own flags so the same arguments that produced a
//! dump select the matching counter.

use crate::utils::config::{COUNTER_FLAGS, DEFAULT_COUNTER_INDEX, SAMPLE_INDEX_FLAG};

/// Select a counter index from pprof-style arguments
///
/// Later arguments win. Unknown flags, a missing or unparsable
/// `-sample_index` value, or an index out of range leave the choice alone.
pub fn select_counter<S: AsRef<str>>(args: &[S], names: &[String]) -> usize {
    let mut selected = DEFAULT_COUNTER_INDEX;

    for (i, arg) in args.iter().enumerate() {
        let arg = arg.as_ref();

        if arg == SAMPLE_INDEX_FLAG {
            if let Some(index) = args.get(i + 1).and_then(|v| parse_sample_index(v.as_ref(), names)) {
                selected = index;
            }
            continue;
        }

        if let Some((_, wanted)) = COUNTER_FLAGS.iter().find(|(flag, _)| *flag == arg) {
            if let Some(index) = names.iter().position(|name| name == wanted) {
                selected = index;
            }
        }
    }

    selected
}

fn parse_sample_index(value: &str, names: &[String]) -> Option<usize> {
    value.parse::<usize>().ok().filter(|index| *index < names.len())
}
