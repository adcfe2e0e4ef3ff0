//! Database path resolution.
//!
//! Precedence: explicit path, then `FORMS_QUESTION_DB`, then the
//! XDG-compliant data directory.

use std::env;
use std::path::PathBuf;

/// Environment variable overriding the database location.
pub const DB_PATH_ENV: &str = "FORMS_QUESTION_DB";

const APP_DIR: &str = "forms-question";
const DB_FILE: &str = "forms.db";

/// Get XDG-compliant data directory.
///
/// # Returns
/// `$XDG_DATA_HOME/forms-question`, else `~/.local/share/forms-question`,
/// else `./.local/share/forms-question` when neither variable is set.
pub fn get_data_dir() -> PathBuf {
    let data_home = env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            env::var("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(".local/share")
        });

    data_home.join(APP_DIR)
}

/// Get the default database file path (data_dir/forms.db).
pub fn get_db_path() -> PathBuf {
    get_data_dir().join(DB_FILE)
}

/// Resolve the database path to open.
pub fn resolve_db_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| {
            env::var(DB_PATH_ENV)
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
        })
        .unwrap_or_else(get_db_path)
}
