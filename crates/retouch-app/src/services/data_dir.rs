// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware data directory resolution.

use std::path::PathBuf;

/// Return the application data directory, creating it if needed.
pub fn data_dir() -> PathBuf {
    let base = base_dir(
        std::env::var("XDG_DATA_HOME").ok(),
        std::env::var("HOME").ok(),
    );
    let dir = base.join("retouch");
    if let Err(e) = std::fs::create_dir_all(&dir) {
        tracing::warn!(path = %dir.display(), error = %e, "could not create data directory");
    }
    dir
}

fn base_dir(xdg_data_home: Option<String>, home: Option<String>) -> PathBuf {
    // XDG data dir, then ~/.local/share
    if let Some(xdg) = xdg_data_home.filter(|s| !s.is_empty()) {
        return PathBuf::from(xdg);
    }
    if let Some(home) = home.filter(|s| !s.is_empty()) {
        return PathBuf::from(home).join(".local").join("share");
    }
    // Last resort
    std::env::temp_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xdg_wins_over_home() {
        let dir = base_dir(Some("/xdg".into()), Some("/home/ada".into()));
        assert_eq!(dir, PathBuf::from("/xdg"));
    }

    #[test]
    fn home_fallback_uses_local_share() {
        let dir = base_dir(None, Some("/home/ada".into()));
        assert_eq!(dir, PathBuf::from("/home/ada/.local/share"));
    }

    #[test]
    fn empty_values_are_ignored() {
        let dir = base_dir(Some(String::new()), None);
        assert_eq!(dir, std::env::temp_dir());
    }
}
