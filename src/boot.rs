use log::{error, info, warn};
use std::fs;
use std::path::Path;

use crate::config::AppConfig;

/// Run all boot checks. Call this before Rocket launches.
/// Creates the database directory when missing and checks it is writable.
/// Returns the number of errors found; the caller decides whether to abort.
pub fn run(config: &AppConfig) -> u32 {
    info!("Boot check starting...");

    let mut warnings = 0u32;
    let mut errors = 0u32;

    // ── 1. Database directory ──────────────────────────
    let db_dir = Path::new(&config.db_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty());
    if let Some(dir) = db_dir {
        if !dir.exists() {
            match fs::create_dir_all(dir) {
                Ok(_) => info!("  Created directory: {}", dir.display()),
                Err(e) => {
                    error!("  FAILED to create directory {}: {}", dir.display(), e);
                    errors += 1;
                }
            }
        }
    }

    // ── 2. Database directory writable ─────────────────
    let dir = db_dir.unwrap_or_else(|| Path::new("."));
    if dir.exists() {
        let test_file = dir.join(".write_test");
        match fs::write(&test_file, "test") {
            Ok(_) => {
                let _ = fs::remove_file(&test_file);
            }
            Err(e) => {
                error!("  Database directory not writable: {}", e);
                errors += 1;
            }
        }
    }

    // ── 3. Admin access ────────────────────────────────
    if config.admin_token.as_deref().map_or(true, str::is_empty) {
        warn!("  No seo.admin_token configured; admin routes will refuse every request");
        warnings += 1;
    }

    // ── 4. Rocket.toml exists ──────────────────────────
    if !Path::new("Rocket.toml").exists() {
        warn!("  Rocket.toml not found — using default config");
        warnings += 1;
    }

    // ── Summary ────────────────────────────────────────
    if errors > 0 {
        error!("Boot check FAILED: {} error(s), {} warning(s).", errors, warnings);
    } else if warnings > 0 {
        warn!("Boot check passed with {} warning(s).", warnings);
    } else {
        info!("Boot check passed. All systems go.");
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_missing_db_directory() {
        let base = std::env::temp_dir().join(format!("seo-boot-{}", std::process::id()));
        let config = AppConfig {
            db_path: base.join("nested/seo.db").to_string_lossy().into_owned(),
            admin_token: Some("t".to_string()),
            nonce_secret: None,
        };
        assert_eq!(run(&config), 0);
        assert!(base.join("nested").is_dir());
        let _ = fs::remove_dir_all(&base);
    }
}
