use log::{error, info, warn};
use std::fs;
use std::path::Path;
use std::process;

use crate::compose::EngineConfig;

/// Required directories that will be created if missing
const REQUIRED_DIRS: &[&str] = &[
    "website",
    "website/db",
    "website/static",
    "website/static/img",
];

/// Run all boot checks. Call this before Rocket launches.
/// Creates missing directories, warns about missing assets, and
/// aborts if the database directory is unusable.
pub fn run() {
    info!("SEOForge boot check starting...");

    let mut warnings = 0u32;
    let mut errors = 0u32;

    // ── 1. Directories ─────────────────────────────────
    for dir in REQUIRED_DIRS {
        let path = Path::new(dir);
        if !path.exists() {
            match fs::create_dir_all(path) {
                Ok(_) => info!("  Created directory: {}", dir),
                Err(e) => {
                    error!("  FAILED to create directory {}: {}", dir, e);
                    errors += 1;
                }
            }
        }
    }

    // ── 2. Database directory writable ──────────────────
    let db_dir = Path::new("website/db");
    if db_dir.exists() {
        let test_file = db_dir.join(".write_test");
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

    // ── 3. Hero fallback images ─────────────────────────
    let defaults = EngineConfig::default();
    for url in [&defaults.hero_default_image_1, &defaults.hero_default_image_2] {
        if let Some(path) = static_path(url) {
            if !Path::new(&path).exists() {
                warn!("  Missing hero fallback image: {} (heroes without images will 404 it)", path);
                warnings += 1;
            }
        }
    }

    // ── 4. Rocket.toml exists ───────────────────────────
    if !Path::new("Rocket.toml").exists() {
        warn!("  Rocket.toml not found, using default config");
        warnings += 1;
    }

    // ── Summary ─────────────────────────────────────────
    if errors > 0 {
        error!(
            "Boot check FAILED: {} error(s), {} warning(s). Aborting.",
            errors, warnings
        );
        process::exit(1);
    }

    if warnings > 0 {
        warn!(
            "Boot check passed with {} warning(s). Some features may not work correctly.",
            warnings
        );
    } else {
        info!("Boot check passed. All systems go.");
    }
}

/// Map a `/static/...` URL to its file under `website/static`.
fn static_path(url: &str) -> Option<String> {
    url.strip_prefix("/static/")
        .map(|rest| format!("website/static/{}", rest))
}
