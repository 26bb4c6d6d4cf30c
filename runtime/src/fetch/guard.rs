//! Destination checks: refuse URLs that point into private networks.
//!
//! Runs on the initial URL and again on every redirect target.

use super::error::FetchError;
use regex::Regex;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;
use url::{Host, Url};

/// Hostnames that resolve to the local machine or cloud metadata services.
static BLOCKED_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(localhost|.+\.localhost|metadata|metadata\.goog|instance-data(\.ec2\.internal)?)\.?$",
    )
    .expect("blocked hostname pattern is valid")
});

/// Private-range and metadata prefixes, matched against the raw hostname.
/// Catches wildcard-DNS names such as `10.0.0.5.nip.io`.
static BLOCKED_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(127\.|10\.|172\.(1[6-9]|2[0-9]|3[01])\.|192\.168\.|0\.|169\.254\.|metadata\.google)",
    )
    .expect("blocked prefix pattern is valid")
});

/// Parse and validate a user-supplied URL: well-formed, http or https.
pub fn parse_target(raw: &str) -> Result<Url, FetchError> {
    let url = Url::parse(raw.trim()).map_err(|_| FetchError::malformed_url())?;
    ensure_web_scheme(&url)?;
    Ok(url)
}

pub(crate) fn ensure_web_scheme(url: &Url) -> Result<(), FetchError> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(FetchError::unsupported_scheme()),
    }
}

/// Reject URLs whose host is loopback, private, link-local, or a metadata endpoint.
pub fn check_destination(url: &Url) -> Result<(), FetchError> {
    let blocked = match url.host() {
        Some(Host::Ipv4(ip)) => is_blocked_v4(ip),
        Some(Host::Ipv6(ip)) => is_blocked_v6(ip),
        Some(Host::Domain(name)) => is_blocked_name(name),
        None => true,
    };

    if blocked {
        let host = url.host_str().unwrap_or_default().to_string();
        tracing::warn!(%host, "blocked request to private address");
        return Err(FetchError::BlockedAddress { host });
    }
    Ok(())
}

fn is_blocked_name(name: &str) -> bool {
    BLOCKED_NAME_RE.is_match(name) || BLOCKED_PREFIX_RE.is_match(name)
}

fn is_blocked_v4(ip: Ipv4Addr) -> bool {
    let [first, ..] = ip.octets();
    first == 0 || ip.is_loopback() || ip.is_private() || ip.is_link_local()
}

fn is_blocked_v6(ip: Ipv6Addr) -> bool {
    if let Some(v4) = ip.to_ipv4_mapped() {
        return is_blocked_v4(v4);
    }
    let [first, ..] = ip.segments();
    ip.is_loopback()
        || ip.is_unspecified()
        // fc00::/7 unique local
        || (first & 0xfe00) == 0xfc00
        // fe80::/10 link local
        || (first & 0xffc0) == 0xfe80
}
