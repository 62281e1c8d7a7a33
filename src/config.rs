use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use rusoto_core::Region;

const DEFAULT_EC2_REGION: &str = "us-east-2";
// Cost Explorer is only served from us-east-1.
const DEFAULT_COST_EXPLORER_REGION: &str = "us-east-1";

#[derive(Debug, PartialEq, Clone)]
pub struct Config {
    pub ec2_region: Region,
    pub cost_explorer_region: Region,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let region = |key: &str, default: &str| -> Result<Region> {
            let name = lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string());
            Region::from_str(name.trim())
                .with_context(|| format!("invalid region {:?} in {}", name, key))
        };
        Ok(Config {
            ec2_region: region("EC2_REGION", DEFAULT_EC2_REGION)?,
            cost_explorer_region: region("COST_EXPLORER_REGION", DEFAULT_COST_EXPLORER_REGION)?,
        })
    }
}

/// Installs the stdout subscriber. The Lambda host timestamps every line itself.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .without_time()
        .init();
}
