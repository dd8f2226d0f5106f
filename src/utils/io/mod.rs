//! I/O utilities for locating and reading input files

pub mod files;

pub use files::{DEFAULT_BATCH_SIZE, InputFormat, find_input_files, read_record_batches};
