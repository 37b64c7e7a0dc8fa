//! Fuzz target for ingestion.
//!
//! Feeds the same bytes to every reader. Each must return a table or an
//! error, never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use orderlens::ingest;

const HINTS: [&str; 6] = ["csv", "tsv", "json", "ndjson", "parquet", "xlsx"];

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    for hint in HINTS {
        let _ = ingest(data, hint);
    }
});
