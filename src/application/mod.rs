pub mod build_snapshot;
pub mod generate_queries;
pub mod process_chunk;
pub mod reconcile;
pub mod retrieve;
pub mod sample;
pub mod summarize;
