//! Effective file mode resolution

use vaultsync_core::types::FileMode;

/// Mode used when neither the mapping nor its group sets one (rwxr-x---)
pub const DEFAULT_FILE_MODE: FileMode = FileMode::new(0o750);

/// Mapping mode wins, then group mode, then [`DEFAULT_FILE_MODE`]
///
/// A zero mode counts as unset at either level.
pub fn resolve_mode(mapping_mode: FileMode, group_mode: FileMode) -> FileMode {
    if mapping_mode.is_set() {
        mapping_mode
    } else if group_mode.is_set() {
        group_mode
    } else {
        DEFAULT_FILE_MODE
    }
}
