//! Logging utilities
//!
//! Standardized messages for file-level operations in a batch run.

use std::path::Path;
use std::time::Duration;

/// Log an operation start with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `path` - Path of the file or directory being operated on
pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{} {}", operation, path.display());
}

/// Log an operation completion with consistent format
///
/// # Arguments
/// * `operation` - Past-tense verb for what happened ("read", "wrote")
/// * `path` - Path of the file or directory that was operated on
/// * `items` - Number of items processed
/// * `item_label` - What the items are ("rows", "patients")
/// * `elapsed` - Optional elapsed time
pub fn log_operation_complete(
    operation: &str,
    path: &Path,
    items: usize,
    item_label: &str,
    elapsed: Option<Duration>,
) {
    if let Some(duration) = elapsed {
        log::info!(
            "Successfully {} {} {} from {} in {:?}",
            operation,
            items,
            item_label,
            path.display(),
            duration
        );
    } else {
        log::info!(
            "Successfully {} {} {} from {}",
            operation,
            items,
            item_label,
            path.display()
        );
    }
}

/// Log an operation warning with consistent format
///
/// # Arguments
/// * `message` - Warning message
/// * `path` - Optional path related to the warning
pub fn log_warning(message: &str, path: Option<&Path>) {
    if let Some(path) = path {
        log::warn!("{}: {}", message, path.display());
    } else {
        log::warn!("{message}");
    }
}
