//! Path resolution for marketbook directories.
//!
//! Provides XDG-compliant path resolution for the store file and the
//! default backup output directory.

use std::env;
use std::path::PathBuf;

/// Get the XDG-compliant data directory for marketbook.
///
/// # Returns
/// Path to data directory: `~/.local/share/marketbook/`
///
/// # Panics
/// Panics if neither XDG_DATA_HOME nor HOME is set.
pub fn get_data_dir() -> PathBuf {
    let data_home = env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".local/share")
        });

    data_home.join("marketbook")
}

/// Get the store file path (data_dir/store.json).
pub fn get_store_path() -> PathBuf {
    get_data_dir().join("store.json")
}

/// Get the default backup output directory (data_dir/backups).
pub fn get_backup_dir() -> PathBuf {
    get_data_dir().join("backups")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_data_dir_ends_with_marketbook() {
        // Just verify the suffix (env vars are unreliable in parallel tests)
        let path = get_data_dir();
        assert!(path.ends_with("marketbook"));
    }

    #[test]
    fn test_get_store_path_ends_with_store_json() {
        let path = get_store_path();
        assert!(path.ends_with("marketbook/store.json"));
    }

    #[test]
    fn test_get_backup_dir_ends_with_backups() {
        let path = get_backup_dir();
        assert!(path.ends_with("marketbook/backups"));
    }
}
