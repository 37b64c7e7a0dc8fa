//! Ingestion: raw bytes in a supported format to a [`Table`](crate::table::Table).

mod columnar;
mod format;
mod infer;
mod json;
mod parser;
mod source;
mod spreadsheet;

pub use format::FileFormat;
pub use infer::parse_literal;
pub use parser::{Parser, ParserConfig, ingest, ingest_with_config};
pub use source::SourceMetadata;
