use stackfold::commands::{execute_fold, fold_graph, fold_raw, FoldArgs, InputFormat};
use std::fs;
use tempfile::tempdir;

const HEAP_DUMP: &str = "PeriodType: space bytes
Samples:
alloc_objects/count alloc_space/bytes inuse_objects/count inuse_space/bytes
   2 2048 1 1024: 1 2
                bytes:[1024]
   1 512 1 512: 1 2
                bytes:[512]
Locations
     1: 0x10 M=1 main.alloc
     2: 0x20 M=1 main.main
Mappings
1: 0x0/0xffff/0x0 /bin/heap
";

#[test]
fn test_fold_raw_default_counter() {
    let out = fold_raw(HEAP_DUMP.as_bytes(), None, &[]).unwrap();
    assert_eq!(out, "main.main;main.alloc 3\n");
}

#[test]
fn test_fold_raw_counter_from_pprof_args() {
    let args = vec!["-inuse_space".to_string()];
    let out = fold_raw(HEAP_DUMP.as_bytes(), None, &args).unwrap();
    assert_eq!(out, "main.main;main.alloc 1536\n");
}

#[test]
fn test_fold_raw_explicit_index_wins() {
    let args = vec!["-inuse_space".to_string()];
    let out = fold_raw(HEAP_DUMP.as_bytes(), Some(1), &args).unwrap();
    assert_eq!(out, "main.main;main.alloc 2560\n");
}

#[test]
fn test_fold_raw_keeps_first_section_only() {
    let dump = format!(
        "{}Samples:\nsamples/count\n9: 1\nLocations\n1: 0x1 other.fn\n",
        HEAP_DUMP
    );
    let out = fold_raw(dump.as_bytes(), None, &[]).unwrap();
    assert_eq!(out, "main.main;main.alloc 3\n");
}

#[test]
fn test_fold_raw_index_out_of_range() {
    let err = fold_raw(HEAP_DUMP.as_bytes(), Some(9), &[]).unwrap_err();
    assert!(err.to_string().contains("out of range"), "got {}", err);
}

#[test]
fn test_fold_graph_without_edges() {
    let err = fold_graph(br#"{ "nodes": [{ "name": "N1" }] }"#).unwrap_err();
    assert!(err.to_string().contains("no activity"), "got {}", err);
}

#[test]
fn test_execute_fold_writes_output_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("graph.json");
    let output = dir.path().join("out").join("folded.txt");
    fs::write(
        &input,
        r#"{
            "nodes": [{ "name": "N1", "tooltip": "main" }, { "name": "N2", "tooltip": "work" }],
            "edges": [{ "src": "N1", "dst": "N2", "weight": 12 }]
        }"#,
    )
    .unwrap();

    execute_fold(FoldArgs {
        input,
        format: InputFormat::Graph,
        output: Some(output.clone()),
        ..FoldArgs::default()
    })
    .unwrap();

    assert_eq!(fs::read_to_string(output).unwrap(), "main;work 12\n");
}

#[test]
fn test_execute_fold_missing_input() {
    let dir = tempdir().unwrap();
    let err = execute_fold(FoldArgs {
        input: dir.path().join("missing.raw"),
        ..FoldArgs::default()
    })
    .unwrap_err();
    assert!(err.to_string().contains("Failed to read"), "got {}", err);
}
