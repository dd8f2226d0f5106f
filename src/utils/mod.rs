//! Shared utilities: Arrow column access, date parsing, file I/O and logging.

pub mod arrow;
pub mod date;
pub mod io;
pub mod logging;

pub use date::{DateFormatConfig, parse_date_string};
pub use io::{find_input_files, read_record_batches};
