use std::fmt;
use tracing::debug;

/// One entry of a `FindProxyForURL` answer such as
/// `"PROXY a.example:8080; SOCKS b.example:1080; DIRECT"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyDirective {
    Direct,
    Http { host: String, port: u16 },
    Https { host: String, port: u16 },
    Socks4 { host: String, port: u16 },
    Socks5 { host: String, port: u16 },
}

impl ProxyDirective {
    /// `DIRECT`, or the proxy as a URL (`http://host:port`, `socks5://...`).
    pub fn to_url(&self) -> String {
        match self {
            ProxyDirective::Direct => "DIRECT".to_string(),
            ProxyDirective::Http { host, port } => format!("http://{}:{}", host, port),
            ProxyDirective::Https { host, port } => format!("https://{}:{}", host, port),
            ProxyDirective::Socks4 { host, port } => format!("socks4://{}:{}", host, port),
            ProxyDirective::Socks5 { host, port } => format!("socks5://{}:{}", host, port),
        }
    }
}

impl fmt::Display for ProxyDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url())
    }
}

/// Parses a PAC answer into directives, in order. Tokens that are not
/// understood, or lack a numeric port, are skipped.
///
/// Plain `SOCKS` means SOCKS5, matching what browsers do today.
pub fn parse_pac_result(raw: &str) -> Vec<ProxyDirective> {
    raw.split(';')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| {
            let directive = parse_token(token);
            if directive.is_none() {
                debug!("Unrecognized proxy token: {:?}", token);
            }
            directive
        })
        .collect()
}

fn parse_token(token: &str) -> Option<ProxyDirective> {
    let (keyword, rest) = match token.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (token, ""),
    };
    let keyword = keyword.to_ascii_uppercase();

    if keyword == "DIRECT" {
        return Some(ProxyDirective::Direct);
    }

    let (host, port) = split_host_port(rest)?;
    let directive = match keyword.as_str() {
        "PROXY" | "HTTP" => ProxyDirective::Http { host, port },
        "HTTPS" => ProxyDirective::Https { host, port },
        "SOCKS4" => ProxyDirective::Socks4 { host, port },
        "SOCKS" | "SOCKS5" => ProxyDirective::Socks5 { host, port },
        _ => return None,
    };
    Some(directive)
}

fn split_host_port(pair: &str) -> Option<(String, u16)> {
    let (host, port) = pair.rsplit_once(':')?;
    if host.is_empty() {
        return None;
    }
    let port = port.trim().parse().ok()?;
    Some((host.trim().to_string(), port))
}
