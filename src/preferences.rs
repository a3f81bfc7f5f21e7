//! Preference manager that merges config.toml defaults with DB overrides.
//!
//! Config values serve as defaults; DB values (user_preferences table) override them.
//! Writes always go to the DB, never to the config file.
use std::collections::HashMap;
use std::time::Duration;

use anyhow::Result;

use crate::config::Config;
use crate::news::CategorySelection;
use crate::storage::Database;

/// Settings key holding the selected category ids as a JSON string array.
pub const CATEGORIES_KEY: &str = "categories";

const REFRESH_INTERVAL_KEY: &str = "refresh_interval_minutes";

// ============================================================================
// PreferenceManager
// ============================================================================

/// Merged preference store: config.toml defaults + DB overrides.
///
/// Reads are in-memory; writes persist to the DB first and only then update
/// the in-memory map.
pub struct PreferenceManager {
    prefs: HashMap<String, String>,
}

impl PreferenceManager {
    /// Load preferences by merging config defaults with DB overrides.
    pub async fn load(config: &Config, db: &Database) -> Result<Self> {
        let mut prefs = Self::flatten_config(config);

        // DB wins over config
        let db_prefs = db.get_preferences_by_prefix("").await?;
        for (key, value) in db_prefs {
            prefs.insert(key, value);
        }

        Ok(Self { prefs })
    }

    /// Create from config only (no DB). Fallback for when DB load fails.
    pub fn from_config(config: &Config) -> Self {
        Self {
            prefs: Self::flatten_config(config),
        }
    }

    /// Get a preference value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.prefs.get(key).map(String::as_str)
    }

    /// Set a preference: writes to DB and updates in-memory map.
    pub async fn set(&mut self, db: &Database, key: &str, value: &str) -> Result<()> {
        db.set_preference(key, value).await?;
        self.prefs.insert(key.to_string(), value.to_string());
        Ok(())
    }

    // ========================================================================
    // Type-safe Accessors
    // ========================================================================

    /// Current category selection.
    ///
    /// Absent, empty, or unreadable values all read as the default
    /// `{"general"}`; unknown ids are kept and resolved away later.
    pub fn categories(&self) -> CategorySelection {
        let Some(raw) = self.get(CATEGORIES_KEY) else {
            return CategorySelection::default();
        };
        match serde_json::from_str::<Vec<String>>(raw) {
            Ok(ids) => CategorySelection::from_stored(ids),
            Err(e) => {
                tracing::warn!(value = %raw, error = %e, "Stored categories unreadable, using default");
                CategorySelection::default()
            }
        }
    }

    /// Persist a new category selection.
    pub async fn set_categories(&mut self, db: &Database, selection: &CategorySelection) -> Result<()> {
        let json = serde_json::to_string(&selection.to_stored())?;
        self.set(db, CATEGORIES_KEY, &json).await
    }

    /// Forget the stored selection so the configured default applies again.
    ///
    /// Returns true if a stored selection was removed.
    pub async fn reset_categories(&mut self, db: &Database, config: &Config) -> Result<bool> {
        let removed = db.delete_preference(CATEGORIES_KEY).await?;
        let json = serde_json::to_string(&config.default_categories)?;
        self.prefs.insert(CATEGORIES_KEY.to_string(), json);
        Ok(removed)
    }

    /// Periodic refresh interval. `None` when the stored minutes are 0 or
    /// unreadable (manual refresh only).
    pub fn refresh_interval(&self) -> Option<Duration> {
        self.get(REFRESH_INTERVAL_KEY)
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&minutes| minutes > 0)
            .map(|minutes| Duration::from_secs(minutes.saturating_mul(60)))
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    fn flatten_config(config: &Config) -> HashMap<String, String> {
        let mut map = HashMap::new();

        map.insert(
            REFRESH_INTERVAL_KEY.to_string(),
            config.refresh_interval_minutes.to_string(),
        );
        // Vec<String> always serializes
        if let Ok(json) = serde_json::to_string(&config.default_categories) {
            map.insert(CATEGORIES_KEY.to_string(), json);
        }

        map
    }
}

// ============================================================================
// Tests
// ============================================================================
