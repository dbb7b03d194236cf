//! Resolver configuration.
//!
//! Defaults enable every strategy. Environment overrides follow the helper
//! convention of comma- or whitespace-delimited lists:
//!
//! - `HYDRATOR_DISABLE_STRATEGIES`: any of `explicit`, `category`, `class`
//! - `HYDRATOR_DISTINCT_INSTANCES`: `0` keeps duplicate display names in
//!   class-catalog instance results

use crate::split_list;
use anyhow::{Result, bail};
use std::env;

pub const DISABLE_STRATEGIES_ENV: &str = "HYDRATOR_DISABLE_STRATEGIES";
pub const DISTINCT_INSTANCES_ENV: &str = "HYDRATOR_DISTINCT_INSTANCES";

/// Which strategies run and how their results are post-processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    pub explicit_map: bool,
    pub category_match: bool,
    pub class_catalog: bool,
    /// Collapse class-catalog instance results to distinct display names.
    pub distinct_instances: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            explicit_map: true,
            category_match: true,
            class_catalog: true,
            distinct_instances: true,
        }
    }
}

impl ResolverConfig {
    /// Build a config from the process environment.
    pub fn from_env() -> Result<Self> {
        let disabled = env::var(DISABLE_STRATEGIES_ENV).unwrap_or_default();
        let distinct = env::var(DISTINCT_INSTANCES_ENV).ok();
        Self::from_values(&disabled, distinct.as_deref())
    }

    /// Build a config from raw override values; `from_env` delegates here.
    pub fn from_values(disabled: &str, distinct_instances: Option<&str>) -> Result<Self> {
        let mut config = Self::default();
        for name in split_list(disabled) {
            match name.to_ascii_lowercase().as_str() {
                "explicit" => config.explicit_map = false,
                "category" => config.category_match = false,
                "class" => config.class_catalog = false,
                other => bail!(
                    "{DISABLE_STRATEGIES_ENV} names unknown strategy '{other}' (expected explicit|category|class)"
                ),
            }
        }
        if let Some(value) = distinct_instances {
            config.distinct_instances = !matches!(value.trim(), "0" | "false" | "no");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_everything() {
        let config = ResolverConfig::from_values("", None).unwrap();
        assert_eq!(config, ResolverConfig::default());
    }

    #[test]
    fn disables_listed_strategies() {
        let config = ResolverConfig::from_values("explicit, Class", Some("0")).unwrap();
        assert!(!config.explicit_map);
        assert!(config.category_match);
        assert!(!config.class_catalog);
        assert!(!config.distinct_instances);
    }

    #[test]
    fn rejects_unknown_strategy() {
        let err = ResolverConfig::from_values("reflection", None).expect_err("unknown name");
        assert!(err.to_string().contains("reflection"));
    }

    #[test]
    fn distinct_flag_accepts_truthy_values() {
        let config = ResolverConfig::from_values("", Some("1")).unwrap();
        assert!(config.distinct_instances);
    }
}
