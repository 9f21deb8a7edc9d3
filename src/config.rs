use std::env;
use std::time::Duration;
use tracing::warn;

pub const RESOLVE_TIMEOUT_VAR: &str = "PACFUNCS_RESOLVE_TIMEOUT_MS";
pub const CACHE_TTL_VAR: &str = "PACFUNCS_CACHE_TTL_SECS";
pub const DOWNLOAD_TIMEOUT_VAR: &str = "PACFUNCS_DOWNLOAD_TIMEOUT_SECS";

/// Tunables for the system collaborators and the PAC evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacConfig {
    /// Upper bound on a single DNS lookup. A lookup that takes longer counts
    /// as unresolvable.
    pub resolve_timeout: Duration,
    /// How long a `FindProxyForURL` answer is reused for the same
    /// scheme and host.
    pub cache_ttl: Duration,
    pub download_timeout: Duration,
}

impl Default for PacConfig {
    fn default() -> Self {
        Self {
            resolve_timeout: Duration::from_secs(5),
            cache_ttl: Duration::from_secs(10),
            download_timeout: Duration::from_secs(15),
        }
    }
}

impl PacConfig {
    /// Defaults overridden by `PACFUNCS_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            resolve_timeout: read_duration(
                &lookup,
                RESOLVE_TIMEOUT_VAR,
                Duration::from_millis,
                defaults.resolve_timeout,
            ),
            cache_ttl: read_duration(&lookup, CACHE_TTL_VAR, Duration::from_secs, defaults.cache_ttl),
            download_timeout: read_duration(
                &lookup,
                DOWNLOAD_TIMEOUT_VAR,
                Duration::from_secs,
                defaults.download_timeout,
            ),
        }
    }
}

fn read_duration(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    unit: fn(u64) -> Duration,
    default: Duration,
) -> Duration {
    let Some(raw) = lookup(name) else {
        return default;
    };
    match raw.trim().parse::<u64>() {
        Ok(value) => unit(value),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a whole number", name, raw);
            default
        }
    }
}
