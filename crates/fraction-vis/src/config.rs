//! Server configuration from the environment.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::driver::DEFAULT_TICK_INTERVAL;
use crate::error::{Error, Result};
use crate::simulator::SimulatorConfig;

/// Configuration for the visualization server.
#[derive(Debug, Clone)]
pub struct VisConfig {
    /// HTTP listen address
    pub addr: SocketAddr,

    /// Interval between playback ticks
    pub tick_interval: Duration,

    /// Simulator settings
    pub simulator: SimulatorConfig,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            tick_interval: DEFAULT_TICK_INTERVAL,
            simulator: SimulatorConfig::default(),
        }
    }
}

impl VisConfig {
    /// Create config from environment variables with sensible defaults.
    ///
    /// - `FRACTION_VIS_ADDR`: listen address (`127.0.0.1:3000`)
    /// - `FRACTION_VIS_TICK_MS`: tick interval in milliseconds (`16`)
    /// - `FRACTION_VIS_SEED`: seed for random problems (entropy)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(addr) = parse_var(&lookup, "FRACTION_VIS_ADDR")? {
            config.addr = addr;
        }

        if let Some(ms) = parse_var::<u64>(&lookup, "FRACTION_VIS_TICK_MS")? {
            if ms == 0 {
                return Err(Error::Config {
                    key: "FRACTION_VIS_TICK_MS",
                    reason: "must be at least 1".to_string(),
                });
            }
            config.tick_interval = Duration::from_millis(ms);
        }

        config.simulator.seed = parse_var(&lookup, "FRACTION_VIS_SEED")?;

        Ok(config)
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|e: T::Err| Error::Config {
            key,
            reason: format!("{:?}: {}", raw, e),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = VisConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.tick_interval, Duration::from_millis(16));
        assert_eq!(config.simulator.seed, None);
    }

    #[test]
    fn reads_overrides() {
        let config = VisConfig::from_lookup(lookup(&[
            ("FRACTION_VIS_ADDR", "0.0.0.0:8080"),
            ("FRACTION_VIS_TICK_MS", "33"),
            ("FRACTION_VIS_SEED", " 42 "),
        ]))
        .unwrap();
        assert_eq!(config.addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.tick_interval, Duration::from_millis(33));
        assert_eq!(config.simulator.seed, Some(42));
    }

    #[test]
    fn rejects_bad_values() {
        let err = VisConfig::from_lookup(lookup(&[("FRACTION_VIS_ADDR", "nowhere")])).unwrap_err();
        assert!(matches!(err, Error::Config { key: "FRACTION_VIS_ADDR", .. }));

        let err = VisConfig::from_lookup(lookup(&[("FRACTION_VIS_TICK_MS", "0")])).unwrap_err();
        assert!(matches!(err, Error::Config { key: "FRACTION_VIS_TICK_MS", .. }));
    }
}
