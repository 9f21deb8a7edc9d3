// src/lib.rs
pub mod config;
pub mod error;
pub mod funcs;
pub mod interface;
pub mod log;
pub mod pac;

pub use config::PacConfig;
pub use error::PacError;
pub use funcs::{PacFunctions, PacValue};
pub use interface::{Clock, DateTimeSample, LocalAddress, Resolver};
pub use pac::{PacEvaluator, ProxyDirective};

use tracing::info;
use url::Url;

/// Evaluates the PAC script at `pac_location` for `url` and returns the
/// first usable proxy.
///
/// `pac_location` may be an `http(s)://` or `file://` URL or a local path.
/// The result is `DIRECT` or a proxy URL such as `http://host:port`.
/// Timeouts and cache lifetime come from [`PacConfig::from_env`].
///
/// # Examples
///
/// ```no_run
/// let proxy = pacfuncs::find_proxy_for_url("http://wpad/wpad.dat", "https://httpbin.org/ip")?;
/// println!("{}", proxy); // DIRECT or http://host:port
/// # Ok::<(), pacfuncs::PacError>(())
/// ```
pub fn find_proxy_for_url(pac_location: &str, url: &str) -> Result<String, PacError> {
    let config = PacConfig::from_env();
    let target = Url::parse(url)?;

    let script = pac::load_pac(pac_location, config.download_timeout)?;
    let evaluator = PacEvaluator::new(script, PacFunctions::system(&config), config.cache_ttl);

    let proxy = evaluator
        .find_proxies(&target)
        .into_iter()
        .next()
        .unwrap_or(ProxyDirective::Direct)
        .to_url();
    info!("PAC resolved proxy for {}: {}", url, proxy);
    Ok(proxy)
}
