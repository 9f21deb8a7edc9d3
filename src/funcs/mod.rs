//! The PAC helper functions.
//!
//! String predicates are free functions. Everything that needs DNS, the local
//! address or the clock hangs off [`PacFunctions`], which owns those
//! capabilities.

mod date_range;
mod glob;
mod host;
mod network;
mod temporal;
mod time_range;

use std::fmt;
use std::sync::Arc;

use crate::config::PacConfig;
use crate::interface::{
    Clock, LocalAddress, Resolver, SystemClock, SystemLocalAddress, SystemResolver,
};

pub use date_range::DateRangeArgs;
pub use glob::sh_exp_match;
pub use host::{dns_domain_is, dns_domain_levels, is_plain_host_name, local_host_or_domain_is};
pub use temporal::{month_from_code, weekday_from_code, WeekdayRangeArgs};
pub use time_range::TimeRangeArgs;

/// An argument as handed over by the script host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PacValue {
    Number(i64),
    Str(String),
    /// undefined, null, fractional numbers, objects
    Other,
}

impl PacValue {
    pub fn as_number(&self) -> Option<i64> {
        match self {
            PacValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PacValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for PacValue {
    fn from(n: i64) -> Self {
        PacValue::Number(n)
    }
}

impl From<i32> for PacValue {
    fn from(n: i32) -> Self {
        PacValue::Number(n.into())
    }
}

impl From<u32> for PacValue {
    fn from(n: u32) -> Self {
        PacValue::Number(n.into())
    }
}

impl From<&str> for PacValue {
    fn from(s: &str) -> Self {
        PacValue::Str(s.to_string())
    }
}

impl From<String> for PacValue {
    fn from(s: String) -> Self {
        PacValue::Str(s)
    }
}

impl fmt::Display for PacValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacValue::Number(n) => write!(f, "{n}"),
            PacValue::Str(s) => write!(f, "{s:?}"),
            PacValue::Other => f.write_str("<other>"),
        }
    }
}

/// The helper functions that depend on the environment.
///
/// Cloning is cheap; clones share the same collaborators.
#[derive(Clone)]
pub struct PacFunctions {
    resolver: Arc<dyn Resolver>,
    clock: Arc<dyn Clock>,
    local: Arc<dyn LocalAddress>,
}

impl PacFunctions {
    pub fn new(
        resolver: Arc<dyn Resolver>,
        clock: Arc<dyn Clock>,
        local: Arc<dyn LocalAddress>,
    ) -> Self {
        Self {
            resolver,
            clock,
            local,
        }
    }

    /// Backed by the system resolver, wall clock and routing table.
    pub fn system(config: &PacConfig) -> Self {
        Self::new(
            Arc::new(SystemResolver::new(config.resolve_timeout)),
            Arc::new(SystemClock),
            Arc::new(SystemLocalAddress),
        )
    }
}

impl fmt::Debug for PacFunctions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacFunctions").finish_non_exhaustive()
    }
}
