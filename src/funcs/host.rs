//! Hostname predicates. Pure string logic, no lookups.

/// True if `host` has no dots at all.
pub fn is_plain_host_name(host: &str) -> bool {
    !host.contains('.')
}

/// True if `host` ends with `domain`, compared byte for byte.
///
/// Only the last occurrence of `domain` counts, so
/// `dns_domain_is("a.org.org", ".org")` holds.
pub fn dns_domain_is(host: &str, domain: &str) -> bool {
    match host.rfind(domain) {
        Some(pos) => pos + domain.len() == host.len(),
        None => false,
    }
}

/// True if `host` equals `hostdom`, or equals its first label when `host`
/// is unqualified.
pub fn local_host_or_domain_is(host: &str, hostdom: &str) -> bool {
    if host == hostdom {
        return true;
    }
    match hostdom.split_once('.') {
        Some((first_label, _)) => host == first_label,
        None => false,
    }
}

/// Number of dots in `host`.
pub fn dns_domain_levels(host: &str) -> usize {
    host.matches('.').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_host_names() {
        assert!(is_plain_host_name("org"));
        assert!(is_plain_host_name("icedtea"));
        assert!(is_plain_host_name(""));
        assert!(!is_plain_host_name("a.b"));
        assert!(!is_plain_host_name(".icedtea.classpath.org"));
        assert!(!is_plain_host_name("icedtea."));
    }

    #[test]
    fn domain_suffixes() {
        assert!(dns_domain_is("foo.example.org", ".org"));
        assert!(dns_domain_is("icedtea.classpath.org", "icedtea.classpath.org"));
        assert!(dns_domain_is("icedtea.classpath.org", ".classpath.org"));
        assert!(!dns_domain_is("foo.example.org", "example.com"));
        assert!(!dns_domain_is("icedtea.classpath.org", "icedtea.classpath"));
        assert!(!dns_domain_is("icedtea.classpath", "icedtea.classpath.org"));
        assert!(!dns_domain_is("icedtea", "icedtea.classpath.org"));
    }

    #[test]
    fn domain_repeated_inside_host_still_matches_at_end() {
        assert!(dns_domain_is("org.example.org", ".org"));
        assert!(dns_domain_is("org.example.org", "org"));
        assert!(!dns_domain_is("org.example.orgx", "org"));
    }

    #[test]
    fn empty_domain_matches_everything() {
        assert!(dns_domain_is("anything", ""));
    }

    #[test]
    fn local_host_or_domain() {
        assert!(localhost_cases().iter().all(|(expected, host, dom)| {
            local_host_or_domain_is(host, dom) == *expected
        }));
    }

    fn localhost_cases() -> Vec<(bool, &'static str, &'static str)> {
        vec![
            (true, "foo", "foo.example.org"),
            (false, "bar", "foo.example.org"),
            (true, "icedtea.classpath.org", "icedtea.classpath.org"),
            (false, "icedtea.classpath.org", "icedtea.classpath.com"),
            (false, "icedtea.classpath", "icedtea.classpath.org"),
            (false, "foo.classpath.org", "icedtea.classpath.org"),
            (true, "foo", "foo"),
            (false, "foo", "foobar"),
        ]
    }

    #[test]
    fn levels_count_dots() {
        assert_eq!(dns_domain_levels("org"), 0);
        assert_eq!(dns_domain_levels("classpath.org"), 1);
        assert_eq!(dns_domain_levels("icedtea.classpath.org"), 2);
        assert_eq!(dns_domain_levels("foo.icedtea.classpath.org"), 3);
        assert_eq!(dns_domain_levels("trailing."), 1);
    }
}
