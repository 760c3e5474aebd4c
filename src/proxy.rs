//! Proxy reachability probe used to pick an engine.

use std::time::Duration;
use tokio::net::TcpStream;
use tracing::{debug, info};

use crate::config::ConfigBag;

/// Engine used when the proxy answers
pub const PROXIED_ENGINE: &str = "google";

/// Engine used without a proxy
pub const DIRECT_ENGINE: &str = "baidu";

const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(7);

/// Split `host:port`, tolerating an `http://` prefix and trailing slash
pub fn parse_address(proxy: &str) -> Option<(String, u16)> {
    let trimmed = proxy.trim();
    let trimmed = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .unwrap_or(trimmed)
        .trim_end_matches('/');

    let (host, port) = trimmed.rsplit_once(':')?;
    let port = port.parse::<u16>().ok()?;
    if host.is_empty() {
        return None;
    }
    Some((host.to_string(), port))
}

/// Whether a TCP connection to the proxy succeeds within `timeout`
pub async fn is_reachable(proxy: &str, timeout: Duration) -> bool {
    let Some((host, port)) = parse_address(proxy) else {
        debug!("Proxy address '{}' is not host:port", proxy);
        return false;
    };

    match tokio::time::timeout(timeout, TcpStream::connect((host.as_str(), port))).await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            debug!("Proxy {} unreachable: {}", proxy, e);
            false
        }
        Err(_) => {
            debug!("Proxy {} probe timed out", proxy);
            false
        }
    }
}

/// Pick the engine from proxy availability: `(engine, proxy_enabled)`
pub async fn select_engine(defaults: &ConfigBag) -> (&'static str, bool) {
    let reachable = match defaults.proxy() {
        Some(proxy) => {
            let timeout = defaults.connection_timeout().unwrap_or(DEFAULT_PROBE_TIMEOUT);
            is_reachable(proxy, timeout).await
        }
        None => false,
    };

    let engine = if reachable { PROXIED_ENGINE } else { DIRECT_ENGINE };
    info!("Proxy reachable: {}, using {}", reachable, engine);
    (engine, reachable)
}
