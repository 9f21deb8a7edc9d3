use regex::Regex;
use tracing::debug;

/// Shell-style match of `input` against `pattern`.
///
/// `*` matches any run of characters and `?` exactly one; everything else is
/// literal, so brackets and braces carry no glob meaning. The whole input
/// must match. A pattern that cannot be compiled matches nothing.
pub fn sh_exp_match(input: &str, pattern: &str) -> bool {
    match Regex::new(&glob_to_regex(pattern)) {
        Ok(re) => re.is_match(input),
        Err(e) => {
            debug!("shExpMatch pattern {:?} rejected: {}", pattern, e);
            false
        }
    }
}

fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2 + 6);
    out.push_str("(?s)^");
    let mut buf = [0u8; 4];
    for ch in pattern.chars() {
        match ch {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            _ => out.push_str(&regex::escape(ch.encode_utf8(&mut buf))),
        }
    }
    out.push('$');
    out
}
