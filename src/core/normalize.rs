use crate::domain::model::{Blocklist, Blocklists, Category, Entry, RawEntries};
use regex::Regex;
use std::collections::BTreeSet;
use std::net::IpAddr;
use std::sync::OnceLock;
use url::{Host, Position, Url};

fn zero_width_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("[\u{200B}-\u{200D}\u{FEFF}]").expect("static regex is valid"))
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> &'a str {
    match value.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => &value[prefix.len()..],
        _ => value,
    }
}

/// Removes zero-width characters, surrounding whitespace, trailing slashes
/// and a leading `http://` / `https://`.
pub fn clean_url(url: &str) -> String {
    let without_zero_width = zero_width_pattern().replace_all(url, "");
    let trimmed = without_zero_width.trim().trim_end_matches('/');
    let without_https = strip_prefix_ignore_case(trimmed, "https://");
    strip_prefix_ignore_case(without_https, "http://").to_string()
}

/// Parses a cleaned, scheme-less entry the way a browser would read it.
pub fn parse_entry(cleaned: &str) -> Option<Url> {
    Url::parse(&format!("http://{}", cleaned)).ok()
}

/// Host of a cleaned entry. Bare IPv6 literals are not valid URL hosts
/// without brackets, so they are tried directly first.
pub fn entry_host(cleaned: &str) -> Option<Host<String>> {
    match cleaned.parse::<IpAddr>() {
        Ok(IpAddr::V4(ip)) => Some(Host::Ipv4(ip)),
        Ok(IpAddr::V6(ip)) => Some(Host::Ipv6(ip)),
        Err(_) => match parse_entry(cleaned)?.host()? {
            // URL 解析會把 "42" 之類的數字當成 0.0.0.42，只接受完整的點分表示
            Host::Ipv4(ip) if !cleaned.contains(&ip.to_string()) => None,
            host => Some(host.to_owned()),
        },
    }
}

pub fn host_ip(host: &Host<String>) -> Option<IpAddr> {
    match host {
        Host::Ipv4(ip) => Some(IpAddr::V4(*ip)),
        Host::Ipv6(ip) => Some(IpAddr::V6(*ip)),
        Host::Domain(_) => None,
    }
}

/// Shape-only discriminator between IP literals and everything else.
pub fn classify(cleaned: &str) -> Category {
    match entry_host(cleaned).as_ref().and_then(host_ip) {
        Some(_) => Category::Ip,
        None => Category::Url,
    }
}

fn is_valid_label(label: &str) -> bool {
    (1..=63).contains(&label.len())
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

fn is_valid_tld(tld: &str) -> bool {
    tld.len() >= 2 && (tld.starts_with("xn--") || tld.bytes().all(|b| b.is_ascii_alphabetic()))
}

/// Lower-cased, punycode-encoded DNS name, or `None` when `host` is not one.
pub fn normalize_domain(host: &str) -> Option<String> {
    let host = host.trim_end_matches('.');
    if host.is_empty() || host.len() > 253 {
        return None;
    }

    let domain = match Host::parse(host).ok()? {
        Host::Domain(domain) => domain,
        Host::Ipv4(_) | Host::Ipv6(_) => return None,
    };

    let labels: Vec<&str> = domain.split('.').collect();
    let valid = labels.len() >= 2
        && labels.iter().all(|label| is_valid_label(label))
        && labels.last().is_some_and(|tld| is_valid_tld(tld));

    valid.then_some(domain)
}

pub fn normalize_url(raw: &str) -> Option<String> {
    let cleaned = clean_url(raw);
    if cleaned.is_empty() || cleaned.eq_ignore_ascii_case("www") {
        return None;
    }

    let url = parse_entry(&cleaned)?;
    let domain = match url.host()? {
        Host::Domain(domain) => normalize_domain(domain)?,
        Host::Ipv4(_) | Host::Ipv6(_) => return None,
    };
    let port = match url.port() {
        Some(0) => return None,
        Some(port) => format!(":{}", port),
        None => String::new(),
    };

    // 只有根路徑時不保留 "/"
    let rest = &url[Position::BeforePath..];
    let rest = match url.path() {
        "/" => &rest[1..],
        _ => rest,
    };
    Some(format!("{}{}{}", domain, port, rest))
}

pub fn normalize_ip(raw: &str) -> Option<IpAddr> {
    entry_host(&clean_url(raw)).as_ref().and_then(host_ip)
}

fn collect_sorted<T: Ord + ToString>(category: Category, values: BTreeSet<T>) -> Blocklist {
    let entries = values.into_iter().map(|v| Entry::new(v.to_string())).collect();
    Blocklist::from_sorted(category, entries)
}

pub fn normalize_urls<I, T>(raw: I) -> Blocklist
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut urls = BTreeSet::new();
    for value in raw {
        match normalize_url(value.as_ref()) {
            Some(url) => {
                urls.insert(url);
            }
            None => tracing::debug!("Dropping malformed URL entry {:?}", value.as_ref()),
        }
    }
    collect_sorted(Category::Url, urls)
}

pub fn normalize_domains<I, T>(raw: I) -> Blocklist
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let domains: BTreeSet<String> = raw
        .into_iter()
        .filter_map(|value| match entry_host(&clean_url(value.as_ref()))? {
            Host::Domain(domain) => normalize_domain(&domain),
            Host::Ipv4(_) | Host::Ipv6(_) => None,
        })
        .collect();
    collect_sorted(Category::Domain, domains)
}

/// IPs sort numerically, IPv4 before IPv6.
pub fn normalize_ips<I, T>(raw: I) -> Blocklist
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut ips = BTreeSet::new();
    for value in raw {
        match normalize_ip(value.as_ref()) {
            Some(ip) => {
                ips.insert(ip);
            }
            None => tracing::debug!("Dropping malformed IP entry {:?}", value.as_ref()),
        }
    }
    collect_sorted(Category::Ip, ips)
}

pub fn normalize_entries<I, T>(raw: I, category: Category) -> Blocklist
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    match category {
        Category::Url => normalize_urls(raw),
        Category::Domain => normalize_domains(raw),
        Category::Ip => normalize_ips(raw),
    }
}

pub fn normalize(raw: &RawEntries) -> Blocklists {
    let urls = normalize_urls(&raw.urls);
    let domains = normalize_domains(urls.iter().map(Entry::as_str));
    let ips = normalize_ips(&raw.ips);

    let dropped = raw.len().saturating_sub(urls.len() + ips.len());
    if dropped > 0 {
        tracing::debug!("{} raw entries dropped or merged during normalization", dropped);
    }

    Blocklists { urls, domains, ips }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_url() {
        assert_eq!(clean_url(" https://evil.com/ "), "evil.com");
        assert_eq!(clean_url("HTTP://Evil.com//"), "Evil.com");
        assert_eq!(clean_url("\u{200B}evil.com\u{FEFF}"), "evil.com");
        assert_eq!(clean_url("https://http://evil.com"), "evil.com");
        assert_eq!(clean_url("evil.com/path/"), "evil.com/path");
    }

    #[test]
    fn test_normalize_collapses_case_and_whitespace() {
        let list = normalize_urls(["evil.com", "EVIL.com", " good.net "]);
        assert_eq!(list.to_strings(), vec!["evil.com", "good.net"]);
        assert_eq!(list.category(), Category::Url);
    }

    #[test]
    fn test_normalize_drops_empty_and_malformed() {
        let list = normalize_urls(["", "   ", "www", "localhost", "e.g", "-bad-.com", "ok.org"]);
        assert_eq!(list.to_strings(), vec!["ok.org"]);
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let raw = ["b.com", "A.com/Path", "a.com/Path", "c.net", "b.com/"];
        let first = normalize_urls(raw);
        let second = normalize_urls(raw);
        assert_eq!(first, second);
        assert_eq!(first.to_strings(), vec!["a.com/Path", "b.com", "c.net"]);
    }

    #[test]
    fn test_normalize_keeps_path_and_port() {
        let list = normalize_urls(["https://Shop.Evil.com:8443/login?x=1"]);
        assert_eq!(list.to_strings(), vec!["shop.evil.com:8443/login?x=1"]);
    }

    #[test]
    fn test_normalize_idn_to_punycode() {
        let list = normalize_urls(["bücher.example"]);
        assert_eq!(list.to_strings(), vec!["xn--bcher-kva.example"]);
    }

    #[test]
    fn test_normalize_ips_sorts_numerically() {
        let list = normalize_ips(["10.0.0.2", "9.1.1.1", "http://10.0.0.10/login", "10.0.0.2", "999.1.1.1"]);
        assert_eq!(list.to_strings(), vec!["9.1.1.1", "10.0.0.2", "10.0.0.10"]);
    }

    #[test]
    fn test_normalize_domains_strip_paths() {
        let list = normalize_domains(["evil.com/a", "evil.com/b", "WWW.Evil.com"]);
        assert_eq!(list.to_strings(), vec!["evil.com", "www.evil.com"]);
    }

    #[test]
    fn test_normalize_entries_dispatches_on_category() {
        let raw = ["Evil.com/x", "1.1.1.1"];
        assert_eq!(normalize_entries(raw, Category::Url).to_strings(), vec!["evil.com/x"]);
        assert_eq!(normalize_entries(raw, Category::Domain).to_strings(), vec!["evil.com"]);
        assert_eq!(normalize_entries(raw, Category::Ip).to_strings(), vec!["1.1.1.1"]);
    }

    #[test]
    fn test_normalize_rejects_invalid_ports() {
        let list = normalize_urls(["evil.com:99999/x", "evil.com:00000", "evil.com:8o80"]);
        assert!(list.is_empty());

        let list = normalize_urls(["evil.com:80/x", "evil.com:8080"]);
        assert_eq!(list.to_strings(), vec!["evil.com/x", "evil.com:8080"]);
    }

    #[test]
    fn test_normalize_treats_backslash_as_path_separator() {
        let list = normalize_urls(["evil.com\\login", "Evil.com\\"]);
        assert_eq!(list.to_strings(), vec!["evil.com", "evil.com/login"]);
        let domains = normalize_domains(["evil.com\\login"]);
        assert_eq!(domains.to_strings(), vec!["evil.com"]);
    }

    #[test]
    fn test_normalize_ips_mixes_v4_and_v6() {
        let list = normalize_ips([
            "2001:DB8:0::1",
            "http://[2001:db8::1]:8080/x",
            "10.0.0.1",
            "[::1]",
            "1.1.1.1/login",
            "fe80::zz",
        ]);
        assert_eq!(list.to_strings(), vec!["1.1.1.1", "10.0.0.1", "::1", "2001:db8::1"]);
    }

    #[test]
    fn test_normalize_never_yields_duplicates_or_blanks() {
        let hosts = ["evil.com", "Shop.Evil.com", "bad-site.net", "xn--bcher-kva.example", "a_b.org"];
        let paths = ["", "/", "/Login", "?q=1", "//"];
        let wrappers: [fn(&str) -> String; 6] = [
            |s| s.to_string(),
            |s| s.to_uppercase(),
            |s| format!("  {}\t", s),
            |s| format!("https://{}", s),
            |s| format!("HTTP://{}\u{200B}", s),
            |s| format!("\u{FEFF}{} ", s.to_lowercase()),
        ];

        let mut raw = vec![String::new(), "   ".to_string(), "www".to_string()];
        for host in hosts {
            for path in paths {
                for wrap in &wrappers {
                    raw.push(wrap(&format!("{}{}", host, path)));
                }
            }
        }

        for category in [Category::Url, Category::Domain] {
            let list = normalize_entries(&raw, category);
            assert!(!list.is_empty());
            assert_eq!(list, normalize_entries(&raw, category));

            let mut seen = std::collections::HashSet::new();
            for entry in list.iter() {
                let value = entry.as_str();
                assert!(!value.trim().is_empty());
                // 路徑區分大小寫，主機名稱不區分
                let host_end = value.find(['/', '?', '#', ':']).unwrap_or(value.len());
                assert_eq!(&value[..host_end], value[..host_end].to_lowercase());
                let key = match category {
                    Category::Domain => value.to_lowercase(),
                    _ => value.to_string(),
                };
                assert!(seen.insert(key), "duplicate entry {}", entry);
            }
        }
    }

    #[test]
    fn test_numeric_shorthand_is_not_an_ip() {
        assert_eq!(classify("42"), Category::Url);
        assert_eq!(classify("1.2"), Category::Url);
        assert!(normalize_ips(["42", "0x7f.1"]).is_empty());
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("1.2.3.4/login"), Category::Ip);
        assert_eq!(classify("1.2.3.4:8080"), Category::Ip);
        assert_eq!(classify("[2001:db8::1]:443/x"), Category::Ip);
        assert_eq!(classify("2001:db8::1"), Category::Ip);
        assert_eq!(classify("evil.com"), Category::Url);
        assert_eq!(classify("user@evil.com/path"), Category::Url);
    }

    #[test]
    fn test_normalize_builds_all_lists() {
        let mut raw = RawEntries::default();
        raw.urls.insert("https://Evil.com/login".to_string());
        raw.urls.insert("evil.com".to_string());
        raw.ips.insert("1.2.3.4/x".to_string());

        let lists = normalize(&raw);
        assert_eq!(lists.urls.to_strings(), vec!["evil.com", "evil.com/login"]);
        assert_eq!(lists.domains.to_strings(), vec!["evil.com"]);
        assert_eq!(lists.ips.to_strings(), vec!["1.2.3.4"]);
        assert!(!lists.is_empty());
    }
}
