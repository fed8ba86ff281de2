use anyhow::{bail, Context};
use chrono::TimeDelta;
use serde::Deserialize;

use crate::services::recommendations::RecommendationSettings;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// PostgreSQL database connection URL. When unset the service runs
    /// against an empty in-memory store.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Progress percentage at which an enrollment counts as completed
    #[serde(default = "default_completion_threshold")]
    pub completion_threshold: u8,

    /// Size of the trending window in days
    #[serde(default = "default_trending_window_days")]
    pub trending_window_days: i64,

    /// Maximum number of courses per recommendation list
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,

    /// Multiplier applied to similarity against in-progress courses
    #[serde(default = "default_in_progress_weight")]
    pub in_progress_weight: f64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_completion_threshold() -> u8 {
    RecommendationSettings::default().completion_threshold
}

fn default_trending_window_days() -> i64 {
    RecommendationSettings::default().trending_window_days
}

fn default_max_recommendations() -> usize {
    RecommendationSettings::default().max_results
}

fn default_in_progress_weight() -> f64 {
    RecommendationSettings::default().in_progress_weight
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>().context("Failed to load config")?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects engine settings that would empty the trending fallback or
    /// overflow the trending window
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_recommendations == 0 {
            bail!("MAX_RECOMMENDATIONS must be at least 1");
        }
        if self.trending_window_days < 0 || TimeDelta::try_days(self.trending_window_days).is_none()
        {
            bail!(
                "TRENDING_WINDOW_DAYS out of range: {}",
                self.trending_window_days
            );
        }
        if !self.in_progress_weight.is_finite() || self.in_progress_weight < 0.0 {
            bail!("IN_PROGRESS_WEIGHT must be a non-negative number");
        }
        Ok(())
    }

    /// Engine tuning derived from this configuration
    pub fn recommendation_settings(&self) -> RecommendationSettings {
        RecommendationSettings {
            completion_threshold: self.completion_threshold.min(100),
            trending_window_days: self.trending_window_days,
            max_results: self.max_recommendations,
            in_progress_weight: self.in_progress_weight,
        }
    }

    /// Address string suitable for `TcpListener::bind`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
