//! Path helpers for config and event input files

use std::path::PathBuf;

/// Resolve a user-supplied path to an absolute one.
///
/// `~` and `~/...` expand to the home directory; relative paths are joined
/// to the working directory; absolute paths pass through. Surrounding
/// whitespace is ignored.
///
/// ```text
/// expand_path("~/bench/statsbridge.json") // -> /home/user/bench/statsbridge.json
/// expand_path("events.ndjson")            // -> /current/dir/events.ndjson
/// expand_path("/etc/statsbridge.json")    // -> /etc/statsbridge.json
/// ```
pub fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();

    if path.is_empty() {
        return std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    }

    let expanded = match (path, dirs::home_dir()) {
        ("~", Some(home)) => home,
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    };

    if expanded.is_relative() {
        std::env::current_dir()
            .map(|cwd| cwd.join(&expanded))
            .unwrap_or(expanded)
    } else {
        expanded
    }
}
