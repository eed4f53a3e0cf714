use std::{env, str::FromStr};

use layer_engine::EngineConfig;

use crate::error::{LabErr, Result};

const DEFAULT_MAX_SIDE: u32 = 512;

/// Settings of the lab driver, read from the environment.
#[derive(Debug, Clone)]
pub struct LabConfig {
    max_side: u32,
    feature_maps: bool,
    engine: EngineConfig,
}

impl LabConfig {
    /// Reads `LAB_MAX_SIDE`, `LAB_FEATURE_MAPS`, `LAB_NORM_EPSILON` and
    /// `LAB_SPARSITY_THRESHOLD`, falling back to defaults for the missing ones.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env` but with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = EngineConfig::default();

        let max_side = parse(&lookup, "LAB_MAX_SIDE")?.unwrap_or(DEFAULT_MAX_SIDE);
        if max_side == 0 {
            return Err(LabErr::InvalidRequest(
                "LAB_MAX_SIDE must be greater than 0".into(),
            ));
        }

        let feature_maps = lookup("LAB_FEATURE_MAPS")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let norm_epsilon =
            parse(&lookup, "LAB_NORM_EPSILON")?.unwrap_or(defaults.norm_epsilon());
        let sparsity_threshold =
            parse(&lookup, "LAB_SPARSITY_THRESHOLD")?.unwrap_or(defaults.sparsity_threshold());

        Ok(Self {
            max_side,
            feature_maps,
            engine: EngineConfig::new(norm_epsilon, sparsity_threshold),
        })
    }

    /// Inputs with a longer side get downscaled to it.
    pub fn max_side(&self) -> u32 {
        self.max_side
    }

    /// Whether per-channel feature maps are written for every stage.
    pub fn feature_maps(&self) -> bool {
        self.feature_maps
    }

    pub fn engine(&self) -> EngineConfig {
        self.engine
    }
}

fn parse<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| LabErr::InvalidRequest(format!("{key} has an invalid value '{raw}'")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = LabConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.max_side(), DEFAULT_MAX_SIDE);
        assert!(!config.feature_maps());
        assert_eq!(config.engine(), EngineConfig::default());
    }

    #[test]
    fn overrides() {
        let config = LabConfig::from_lookup(lookup(&[
            ("LAB_MAX_SIDE", "64"),
            ("LAB_FEATURE_MAPS", "true"),
            ("LAB_NORM_EPSILON", "1e-8"),
            ("LAB_SPARSITY_THRESHOLD", "0.01"),
        ]))
        .unwrap();

        assert_eq!(config.max_side(), 64);
        assert!(config.feature_maps());
        assert_eq!(config.engine().norm_epsilon(), 1e-8);
        assert_eq!(config.engine().sparsity_threshold(), 0.01);
    }

    #[test]
    fn rejects_garbage() {
        let err = LabConfig::from_lookup(lookup(&[("LAB_MAX_SIDE", "big")])).unwrap_err();
        assert!(matches!(err, LabErr::InvalidRequest(_)));

        let err = LabConfig::from_lookup(lookup(&[("LAB_MAX_SIDE", "0")])).unwrap_err();
        assert!(matches!(err, LabErr::InvalidRequest(_)));
    }
}
