//! Capabilities the helper functions consume from the host environment.
//!
//! Every predicate that needs the outside world goes through one of these
//! traits, so evaluation can be pinned to a fixed clock and resolver.

use chrono::{Datelike, Local, Timelike, Utc};
use std::net::{IpAddr, Ipv4Addr, ToSocketAddrs, UdpSocket};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Hostname to IPv4 lookup. Any failure, timeouts included, is `None`.
pub trait Resolver: Send + Sync {
    fn resolve(&self, host: &str) -> Option<Ipv4Addr>;
}

/// Source of the current moment, in local time or GMT.
pub trait Clock: Send + Sync {
    fn now(&self, gmt: bool) -> DateTimeSample;
}

/// The machine's own IPv4 address.
pub trait LocalAddress: Send + Sync {
    fn local_address(&self) -> Ipv4Addr;
}

/// One reading of the clock, decomposed the way PAC scripts see it.
///
/// `year` is the full calendar year (2024, not 124). `month` counts from 0
/// and `weekday` from Sunday = 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeSample {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub weekday: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl DateTimeSample {
    pub fn from_datetime<T: Datelike + Timelike>(dt: &T) -> Self {
        let sample = Self {
            year: dt.year(),
            month: dt.month0(),
            day: dt.day(),
            weekday: dt.weekday().num_days_from_sunday(),
            hour: dt.hour(),
            minute: dt.minute(),
            second: dt.second(),
        };
        sample.debug_check();
        sample
    }

    fn debug_check(&self) {
        debug_assert!(self.month < 12, "month out of range: {}", self.month);
        debug_assert!((1..=31).contains(&self.day), "day out of range: {}", self.day);
        debug_assert!(self.weekday < 7, "weekday out of range: {}", self.weekday);
        debug_assert!(self.hour < 24, "hour out of range: {}", self.hour);
        debug_assert!(self.minute < 60, "minute out of range: {}", self.minute);
        debug_assert!(self.second < 60, "second out of range: {}", self.second);
    }
}

/// Looks names up through the operating system resolver.
#[derive(Debug, Clone)]
pub struct SystemResolver {
    timeout: Duration,
}

impl SystemResolver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Resolver for SystemResolver {
    fn resolve(&self, host: &str) -> Option<Ipv4Addr> {
        if let Ok(ip) = host.parse::<Ipv4Addr>() {
            return Some(ip);
        }
        if host.is_empty() {
            return None;
        }

        // getaddrinfo cannot be cancelled; an abandoned lookup finishes on its own thread.
        let (tx, rx) = mpsc::channel();
        let name = host.to_string();
        let spawned = thread::Builder::new()
            .name("pac-resolve".into())
            .spawn(move || {
                let first_v4 = (name.as_str(), 0).to_socket_addrs().ok().and_then(|addrs| {
                    addrs
                        .filter_map(|addr| match addr.ip() {
                            IpAddr::V4(ip) => Some(ip),
                            IpAddr::V6(_) => None,
                        })
                        .next()
                });
                let _ = tx.send(first_v4);
            });
        if let Err(e) = spawned {
            warn!("Could not start resolver thread for {}: {}", host, e);
            return None;
        }

        match rx.recv_timeout(self.timeout) {
            Ok(answer) => {
                debug!("Resolved {} -> {:?}", host, answer);
                answer
            }
            Err(_) => {
                warn!("Resolving {} timed out after {:?}", host, self.timeout);
                None
            }
        }
    }
}

/// Reads the wall clock through chrono.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self, gmt: bool) -> DateTimeSample {
        if gmt {
            DateTimeSample::from_datetime(&Utc::now())
        } else {
            DateTimeSample::from_datetime(&Local::now())
        }
    }
}

/// A clock stopped at one moment. The GMT flag is ignored.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTimeSample);

impl Clock for FixedClock {
    fn now(&self, _gmt: bool) -> DateTimeSample {
        self.0
    }
}

/// Finds the address of the interface used for outbound traffic.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLocalAddress;

impl LocalAddress for SystemLocalAddress {
    fn local_address(&self) -> Ipv4Addr {
        // connect() on UDP only picks a route, nothing is sent
        let routed = UdpSocket::bind("0.0.0.0:0")
            .and_then(|socket| {
                socket.connect("8.8.8.8:53")?;
                socket.local_addr()
            })
            .ok()
            .and_then(|addr| match addr.ip() {
                IpAddr::V4(ip) if !ip.is_unspecified() => Some(ip),
                _ => None,
            });

        routed.unwrap_or_else(|| {
            debug!("No routable local address, using loopback");
            Ipv4Addr::LOCALHOST
        })
    }
}
