use serde::{Deserialize, Serialize};

/// Tracking-code shape and generator seeding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub prefix: String,
    /// Number of random characters after the prefix.
    pub length: usize,
    /// Fixed seed for reproducible codes. `None` seeds from OS entropy.
    pub seed:   Option<u64>,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            prefix: "CMP-".into(),
            length: 8,
            seed:   None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Calendar days in the activity series, ending today.
    pub window_days:           u32,
    pub recent_resolved_limit: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            window_days:           7,
            recent_resolved_limit: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    pub database_path: String,
    pub tracking:      TrackingConfig,
    pub analytics:     AnalyticsConfig,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            database_path: "complaints.db".into(),
            tracking:      TrackingConfig::default(),
            analytics:     AnalyticsConfig::default(),
        }
    }
}

impl DeskConfig {
    /// Load from a JSON file. Missing keys fall back to defaults.
    /// In tests, use DeskConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: DeskConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tracking.length < 4 {
            anyhow::bail!(
                "tracking.length must be at least 4, got {}",
                self.tracking.length
            );
        }
        if self.analytics.window_days == 0 {
            anyhow::bail!("analytics.window_days must be positive");
        }
        Ok(())
    }

    /// In-memory database and a fixed tracking seed.
    pub fn default_test() -> Self {
        Self {
            database_path: ":memory:".into(),
            tracking: TrackingConfig {
                seed: Some(42),
                ..TrackingConfig::default()
            },
            analytics: AnalyticsConfig::default(),
        }
    }
}
