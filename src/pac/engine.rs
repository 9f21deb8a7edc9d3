use super::cache::TimedCache;
use super::result::{parse_pac_result, ProxyDirective};
use crate::error::PacError;
use crate::funcs::{self, PacFunctions, PacValue};
use boa_engine::{
    js_string, Context, JsResult, JsString, JsValue, NativeFunction, Source,
};
use boa_gc::{Finalize, Trace};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

const DIRECT: &str = "DIRECT";

/// Runs a PAC script against URLs, with the helper functions bound to
/// `functions`.
///
/// Each evaluation uses a fresh JavaScript context, so scripts cannot carry
/// state from one lookup to the next.
pub struct PacEvaluator {
    script: String,
    functions: PacFunctions,
    cache: Mutex<TimedCache<String>>,
}

impl PacEvaluator {
    pub fn new(script: impl Into<String>, functions: PacFunctions, cache_ttl: Duration) -> Self {
        Self {
            script: script.into(),
            functions,
            cache: Mutex::new(TimedCache::new(cache_ttl)),
        }
    }

    /// The raw `FindProxyForURL(url, host)` answer.
    pub fn evaluate(&self, url: &Url) -> Result<String, PacError> {
        let host = url
            .host_str()
            .ok_or_else(|| PacError::NoHost(url.to_string()))?;
        execute_pac_script(&self.script, &self.functions, url.as_str(), host)
    }

    /// Cached answer for `url`. Evaluation failures fall back to `DIRECT`.
    ///
    /// Answers are cached per scheme and host, so paths on the same host
    /// share one evaluation while the entry is fresh.
    pub fn find_proxy(&self, url: &Url) -> String {
        let key = cache_key(url);
        if let Some(hit) = self.cache.lock().ok().and_then(|mut c| c.get(&key)) {
            debug!("PAC cache hit for {}", key);
            return hit;
        }

        let answer = match self.evaluate(url) {
            Ok(answer) => answer,
            Err(e) => {
                warn!("PAC evaluation failed for {}: {}. Falling back to DIRECT", url, e);
                DIRECT.to_string()
            }
        };

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, answer.clone());
        }
        answer
    }

    /// Parsed form of [`find_proxy`](Self::find_proxy). Never empty: an
    /// answer with no usable directive becomes `[Direct]`.
    pub fn find_proxies(&self, url: &Url) -> Vec<ProxyDirective> {
        let answer = self.find_proxy(url);
        let directives = parse_pac_result(&answer);
        if directives.is_empty() {
            warn!("PAC returned no valid proxy ({:?}), falling back to DIRECT", answer);
            return vec![ProxyDirective::Direct];
        }
        directives
    }
}

fn cache_key(url: &Url) -> String {
    format!("{}://{}", url.scheme(), url.host_str().unwrap_or_default())
}

fn execute_pac_script(
    script: &str,
    functions: &PacFunctions,
    url: &str,
    host: &str,
) -> Result<String, PacError> {
    let mut context = Context::default();

    register_pac_functions(&mut context, functions)?;

    context.eval(Source::from_bytes(script.as_bytes()))?;

    let global = context.global_object();
    let func_val = global.get(js_string!("FindProxyForURL"), &mut context)?;

    let Some(func) = func_val.as_callable() else {
        return Err(PacError::MissingFunction);
    };

    let args = [
        JsValue::from(JsString::from(url)),
        JsValue::from(JsString::from(host)),
    ];

    let result = func.call(&JsValue::undefined(), &args, &mut context)?;
    let js_str: JsString = result.to_string(&mut context)?;

    let answer = js_str.to_std_string_escaped();
    info!("FindProxyForURL({}) = {}", url, answer);
    Ok(answer)
}

/// The argument at `index` when it is a string. Missing and non-string
/// arguments are `None`.
fn string_arg(args: &[JsValue], index: usize) -> Option<String> {
    args.get(index)
        .and_then(|v| v.as_string())
        .map(|s| s.to_std_string_escaped())
}

fn string_pair(args: &[JsValue]) -> Option<(String, String)> {
    Some((string_arg(args, 0)?, string_arg(args, 1)?))
}

fn pac_value(value: &JsValue) -> PacValue {
    if let Some(s) = value.as_string() {
        return PacValue::Str(s.to_std_string_escaped());
    }
    match value.as_number() {
        Some(n) if n.fract() == 0.0 && n.is_finite() => PacValue::Number(n as i64),
        _ => PacValue::Other,
    }
}

fn pac_values(args: &[JsValue]) -> Vec<PacValue> {
    args.iter().map(pac_value).collect()
}

/// Helper functions handed to native closures. They hold no script values,
/// so the collector has nothing to trace.
#[derive(Trace, Finalize)]
struct Captured {
    #[unsafe_ignore_trace]
    functions: PacFunctions,
}

/// Builds a native function around a closure over the helper functions.
fn native<F>(functions: &PacFunctions, body: F) -> NativeFunction
where
    F: Fn(&PacFunctions, &[JsValue]) -> JsResult<JsValue> + Copy + 'static,
{
    NativeFunction::from_copy_closure_with_captures(
        move |_this, args, captured: &Captured, _ctx| body(&captured.functions, args),
        Captured {
            functions: functions.clone(),
        },
    )
}

fn register_pac_functions(context: &mut Context, functions: &PacFunctions) -> JsResult<()> {
    let plain: [(&str, usize, NativeFunction); 5] = [
        (
            "isPlainHostName",
            1,
            NativeFunction::from_fn_ptr(|_this, args, _ctx| {
                Ok(string_arg(args, 0)
                    .is_some_and(|host| funcs::is_plain_host_name(&host))
                    .into())
            }),
        ),
        (
            "dnsDomainIs",
            2,
            NativeFunction::from_fn_ptr(|_this, args, _ctx| {
                Ok(string_pair(args)
                    .is_some_and(|(host, domain)| funcs::dns_domain_is(&host, &domain))
                    .into())
            }),
        ),
        (
            "localHostOrDomainIs",
            2,
            NativeFunction::from_fn_ptr(|_this, args, _ctx| {
                Ok(string_pair(args)
                    .is_some_and(|(host, hostdom)| funcs::local_host_or_domain_is(&host, &hostdom))
                    .into())
            }),
        ),
        (
            "dnsDomainLevels",
            1,
            NativeFunction::from_fn_ptr(|_this, args, _ctx| {
                let levels = string_arg(args, 0).map_or(0, |host| funcs::dns_domain_levels(&host));
                Ok(JsValue::from(levels as i32))
            }),
        ),
        (
            "shExpMatch",
            2,
            NativeFunction::from_fn_ptr(|_this, args, _ctx| {
                Ok(string_pair(args)
                    .is_some_and(|(text, pattern)| funcs::sh_exp_match(&text, &pattern))
                    .into())
            }),
        ),
    ];

    let bound: [(&str, usize, NativeFunction); 7] = [
        (
            "isResolvable",
            1,
            native(functions, |f, args| {
                Ok(string_arg(args, 0)
                    .is_some_and(|host| f.is_resolvable(&host))
                    .into())
            }),
        ),
        (
            "dnsResolve",
            1,
            native(functions, |f, args| {
                Ok(match string_arg(args, 0).and_then(|host| f.dns_resolve(&host)) {
                    Some(ip) => JsString::from(ip.to_string().as_str()).into(),
                    None => JsValue::null(),
                })
            }),
        ),
        (
            "myIpAddress",
            0,
            native(functions, |f, _args| {
                Ok(JsString::from(f.my_ip_address().to_string().as_str()).into())
            }),
        ),
        (
            "isInNet",
            3,
            native(functions, |f, args| {
                let matched = match (string_arg(args, 0), string_arg(args, 1), string_arg(args, 2)) {
                    (Some(host), Some(pattern), Some(mask)) => f.is_in_net(&host, &pattern, &mask),
                    _ => false,
                };
                Ok(matched.into())
            }),
        ),
        (
            "weekdayRange",
            3,
            native(functions, |f, args| Ok(f.weekday_range(&pac_values(args)).into())),
        ),
        (
            "dateRange",
            7,
            native(functions, |f, args| Ok(f.date_range(&pac_values(args)).into())),
        ),
        (
            "timeRange",
            7,
            native(functions, |f, args| Ok(f.time_range(&pac_values(args)).into())),
        ),
    ];

    for (name, length, body) in plain.into_iter().chain(bound) {
        context.register_global_callable(JsString::from(name), length, body)?;
    }

    // A script may call alert() for diagnostics.
    context.register_global_callable(
        js_string!("alert"),
        1,
        NativeFunction::from_fn_ptr(|_this, args, _ctx| {
            let message = args
                .first()
                .map(|v| v.display().to_string())
                .unwrap_or_default();
            info!("PAC alert: {}", message);
            Ok(JsValue::undefined())
        }),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::funcs::tests::{functions_at, sample};

    fn evaluator(script: &str) -> PacEvaluator {
        // Friday 2024-06-14 12:30:00
        let functions = functions_at(sample(2024, 5, 14, 5, 12, 30, 0));
        PacEvaluator::new(script, functions, Duration::from_secs(60))
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn calls_find_proxy_with_url_and_host() {
        let pac = evaluator(
            r#"function FindProxyForURL(url, host) { return "PROXY " + host + ":1; " + url; }"#,
        );
        let answer = pac.evaluate(&url("http://example.org/a")).unwrap();
        assert_eq!(answer, "PROXY example.org:1; http://example.org/a");
    }

    #[test]
    fn helpers_are_visible_to_scripts() {
        let pac = evaluator(
            r#"
            function FindProxyForURL(url, host) {
                var checks = [
                    isPlainHostName("intranet"),
                    dnsDomainIs(host, ".classpath.org"),
                    localHostOrDomainIs("icedtea", host),
                    dnsDomainLevels(host) === 2,
                    shExpMatch(url, "*/foo/*"),
                    isResolvable(host),
                    dnsResolve(host) === "208.78.240.231",
                    dnsResolve("nowhere") === null,
                    myIpAddress() === "192.168.1.20",
                    isInNet(host, "208.78.0.0", "255.255.0.0"),
                    weekdayRange("FRI"),
                    weekdayRange("SAT", "MON") === false,
                    dateRange("JUN"),
                    dateRange(1, "JUN", 30, "JUN", "GMT"),
                    timeRange(12),
                    timeRange(12, 0, 13, 0),
                ];
                for (var i = 0; i < checks.length; i++) {
                    if (checks[i] !== true) { return "PROXY failed:" + i; }
                }
                return "DIRECT";
            }
            "#,
        );
        let answer = pac
            .evaluate(&url("http://icedtea.classpath.org/foo/bar"))
            .unwrap();
        assert_eq!(answer, "DIRECT");
    }

    #[test]
    fn malformed_helper_arguments_are_false() {
        let pac = evaluator(
            r#"
            function FindProxyForURL(url, host) {
                var checks = [
                    isPlainHostName(),
                    isPlainHostName(5),
                    dnsDomainIs(host),
                    dnsDomainIs(host, 5),
                    localHostOrDomainIs(host),
                    shExpMatch(url),
                    shExpMatch(url, null),
                    isResolvable(),
                    isInNet(host, "208.78.0.0"),
                    isInNet(host, "208.78.0.0", 0),
                ];
                for (var i = 0; i < checks.length; i++) {
                    if (checks[i] !== false) { return "PROXY matched:" + i; }
                }
                if (dnsResolve() !== null) { return "PROXY resolved"; }
                if (dnsDomainLevels() !== 0) { return "PROXY levels"; }
                return "DIRECT";
            }
            "#,
        );
        let answer = pac
            .evaluate(&url("http://icedtea.classpath.org/foo"))
            .unwrap();
        assert_eq!(answer, "DIRECT");
    }

    #[test]
    fn missing_entry_point() {
        let pac = evaluator("var x = 1;");
        let err = pac.evaluate(&url("http://a.b/")).unwrap_err();
        assert!(matches!(err, PacError::MissingFunction));
    }

    #[test]
    fn script_errors_fall_back_to_direct() {
        let pac = evaluator("function FindProxyForURL(url, host) { throw 'boom'; }");
        assert!(matches!(
            pac.evaluate(&url("http://a.b/")),
            Err(PacError::Script(_))
        ));
        assert_eq!(pac.find_proxy(&url("http://a.b/")), "DIRECT");
        assert_eq!(pac.find_proxies(&url("http://a.b/")), vec![ProxyDirective::Direct]);
    }

    #[test]
    fn urls_without_host_are_rejected() {
        let pac = evaluator("function FindProxyForURL(url, host) { return 'DIRECT'; }");
        assert!(matches!(
            pac.evaluate(&url("data:text/plain,hi")),
            Err(PacError::NoHost(_))
        ));
    }

    #[test]
    fn answers_are_cached_per_scheme_and_host() {
        let pac = evaluator(
            r#"
            function FindProxyForURL(url, host) { return "PROXY p" + url.length + ":8080"; }
            "#,
        );
        let first = pac.find_proxy(&url("http://example.org/a"));
        let second = pac.find_proxy(&url("http://example.org/much/longer/path"));
        assert_eq!(first, second);
        let other = pac.find_proxy(&url("https://example.org/a"));
        assert_ne!(first, other);
    }

    #[test]
    fn parsed_directives() {
        let pac = evaluator(
            r#"function FindProxyForURL(url, host) {
                if (isPlainHostName(host)) { return "DIRECT"; }
                return "PROXY proxy.corp:3128; SOCKS socks.corp:1080; DIRECT";
            }"#,
        );
        let directives = pac.find_proxies(&url("https://www.example.com/"));
        assert_eq!(
            directives.iter().map(ProxyDirective::to_url).collect::<Vec<_>>(),
            vec!["http://proxy.corp:3128", "socks5://socks.corp:1080", "DIRECT"]
        );
        assert_eq!(pac.find_proxies(&url("http://intranet/")), vec![ProxyDirective::Direct]);
    }

    #[test]
    fn garbage_answer_becomes_direct() {
        let pac = evaluator("function FindProxyForURL(url, host) { return 'nonsense'; }");
        assert_eq!(pac.find_proxies(&url("http://a.b/")), vec![ProxyDirective::Direct]);
    }

    #[test]
    fn script_values_are_classified() {
        assert_eq!(pac_value(&JsValue::from(5)), PacValue::Number(5));
        assert_eq!(pac_value(&JsValue::from(5.5)), PacValue::Other);
        assert_eq!(pac_value(&JsValue::undefined()), PacValue::Other);
        assert_eq!(
            pac_value(&JsValue::from(JsString::from("GMT"))),
            PacValue::Str("GMT".into())
        );
    }
}
