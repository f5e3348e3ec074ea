//! Configuration and constants for the folding pipelines.

/// Line marker that opens the sample region of a raw dump
pub const SAMPLES_MARKER: &str = "Samples";

/// Line marker that opens the location (function id) region
pub const LOCATIONS_MARKER: &str = "Locations";

/// Line marker that opens the mapping region (ignored)
pub const MAPPINGS_MARKER: &str = "Mappings";

/// Sample lines carrying this substring are heap-size annotations
pub const HEAP_ANNOTATION_MARKER: &str = "bytes:[";

/// Location token naming the binary mapping, shifts the name one field right
pub const MAPPING_TOKEN_PREFIX: &str = "M=";

/// Name rendered for a function id that has no location entry
pub const MISSING_FUNCTION_PREFIX: &str = "missing-function-";

// Graph nodes emitted by the profiler are named N1, N2, ...
// Anything else (cluster containers like "L") is a parser artifact.
pub const NODE_NAME_PREFIX: &str = "N";

/// Separator between frames in a folded stack line
pub const FRAME_SEPARATOR: &str = ";";

/// Counter used when the caller does not select one
pub const DEFAULT_COUNTER_INDEX: usize = 0;

// pprof flags that pick a well-known counter by name
pub const COUNTER_FLAGS: &[(&str, &str)] = &[
    ("-inuse_space", "inuse_space/bytes"),
    ("-inuse_objects", "inuse_objects/count"),
    ("-alloc_space", "alloc_space/bytes"),
    ("-alloc_objects", "alloc_objects/count"),
];

/// pprof flag that picks a counter by position
pub const SAMPLE_INDEX_FLAG: &str = "-sample_index";
