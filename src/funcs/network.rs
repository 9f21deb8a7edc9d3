use std::net::Ipv4Addr;
use tracing::debug;

use super::PacFunctions;

impl PacFunctions {
    /// True if the resolver can turn `host` into an IPv4 address.
    pub fn is_resolvable(&self, host: &str) -> bool {
        self.resolver.resolve(host).is_some()
    }

    /// The IPv4 address of `host`, or `None` when it cannot be resolved.
    pub fn dns_resolve(&self, host: &str) -> Option<Ipv4Addr> {
        self.resolver.resolve(host)
    }

    pub fn my_ip_address(&self) -> Ipv4Addr {
        self.local.local_address()
    }

    /// True if `host` resolves to an address equal to `pattern` on every bit
    /// set in `mask`.
    ///
    /// `pattern` and `mask` are dotted quads. Each component is masked as a
    /// plain integer, so out-of-range components are tolerated; anything that
    /// is not four numeric components never matches.
    pub fn is_in_net(&self, host: &str, pattern: &str, mask: &str) -> bool {
        let Some(addr) = self.resolver.resolve(host) else {
            debug!("isInNet: {} does not resolve", host);
            return false;
        };
        let (Some(pattern), Some(mask)) = (parse_quad(pattern), parse_quad(mask)) else {
            debug!("isInNet: malformed pattern {:?} or mask {:?}", pattern, mask);
            return false;
        };

        addr.octets()
            .iter()
            .zip(pattern.iter().zip(mask.iter()))
            .all(|(&octet, (&p, &m))| (u32::from(octet) & m) == (p & m))
    }
}

fn parse_quad(quad: &str) -> Option<[u32; 4]> {
    let mut parts = [0u32; 4];
    let mut count = 0;
    for part in quad.split('.') {
        if count == 4 {
            return None;
        }
        parts[count] = part.trim().parse().ok()?;
        count += 1;
    }
    (count == 4).then_some(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::funcs::tests::{functions_at, sample};

    #[test]
    fn quads_need_exactly_four_numbers() {
        assert_eq!(parse_quad("10.0.0.1"), Some([10, 0, 0, 1]));
        assert_eq!(parse_quad("2081.78.240.231"), Some([2081, 78, 240, 231]));
        assert_eq!(parse_quad("10.0.0"), None);
        assert_eq!(parse_quad("10.0.0.1.5"), None);
        assert_eq!(parse_quad("10.0.x.1"), None);
        assert_eq!(parse_quad(""), None);
    }

    #[test]
    fn resolution() {
        let pac = functions_at(sample(2024, 0, 1, 1, 12, 0, 0));
        assert!(pac.is_resolvable("icedtea.classpath.org"));
        assert!(!pac.is_resolvable("NotIcedTeaHost"));
        assert_eq!(
            pac.dns_resolve("icedtea.classpath.org"),
            Some(Ipv4Addr::new(208, 78, 240, 231))
        );
        assert_eq!(pac.dns_resolve("localhost"), Some(Ipv4Addr::LOCALHOST));
        assert_eq!(pac.dns_resolve("foobar.classpath.org"), None);
        assert_eq!(pac.my_ip_address(), Ipv4Addr::new(192, 168, 1, 20));
    }

    #[test]
    fn net_membership() {
        let pac = functions_at(sample(2024, 0, 1, 1, 12, 0, 0));
        let host = "icedtea.classpath.org";
        for mask in ["255.255.255.255", "255.255.255.0", "255.255.0.0", "255.0.0.0", "0.0.0.0"] {
            assert!(pac.is_in_net(host, "208.78.240.231", mask), "{mask}");
        }
        for mask in ["255.255.255.255", "255.255.255.0", "255.255.0.0", "255.0.0.0"] {
            assert!(!pac.is_in_net(host, "2081.78.240.231", mask), "{mask}");
        }
        assert!(pac.is_in_net(host, "2081.78.240.231", "0.0.0.0"));
        assert!(pac.is_in_net(host, "208.78.0.0", "255.255.0.0"));
        assert!(!pac.is_in_net(host, "208.79.0.0", "255.255.0.0"));
    }

    #[test]
    fn zero_mask_matches_any_resolvable_host() {
        let pac = functions_at(sample(2024, 0, 1, 1, 12, 0, 0));
        for host in ["icedtea.classpath.org", "localhost", "10.9.8.7"] {
            for pattern in ["0.0.0.0", "1.2.3.4", "255.255.255.255"] {
                assert!(pac.is_in_net(host, pattern, "0.0.0.0"));
            }
        }
    }

    #[test]
    fn malformed_input_is_no_match() {
        let pac = functions_at(sample(2024, 0, 1, 1, 12, 0, 0));
        assert!(!pac.is_in_net("NotIcedTeaHost", "0.0.0.0", "0.0.0.0"));
        assert!(!pac.is_in_net("localhost", "127.0.0", "255.0.0.0"));
        assert!(!pac.is_in_net("localhost", "127.0.0.1", "255.0.0"));
        assert!(!pac.is_in_net("localhost", "127.0.0.1", "mask"));
    }
}
