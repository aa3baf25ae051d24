//! Settlement status endpoints for bridge actions.
//!
//! The planner only records where an external poller can check that bridged
//! funds arrived. Callers must vet a recorded endpoint with
//! [`validate_status_endpoint`] before sending anything to it.

use crate::errors::{PlanError, Result};
use url::{Host, Url};

pub const ACROSS_STATUS_ENDPOINT: &str = "https://app.across.to/api/deposit/status";
pub const LIFI_STATUS_ENDPOINT: &str = "https://li.quest/v1/status";

/// Canonical status endpoint for a bridge provider.
pub fn canonical_status_endpoint(provider: &str) -> Option<&'static str> {
	match provider {
		"across" => Some(ACROSS_STATUS_ENDPOINT),
		"lifi" => Some(LIFI_STATUS_ENDPOINT),
		_ => None,
	}
}

/// Accepts the provider's canonical endpoint or any loopback endpoint.
pub fn validate_status_endpoint(provider: &str, endpoint: &str) -> Result<()> {
	let endpoint = endpoint.trim();
	if canonical_status_endpoint(provider) == Some(endpoint) || is_loopback_url(endpoint) {
		return Ok(());
	}
	Err(PlanError::Usage(format!(
		"Status endpoint '{}' is not allowed for provider '{}'",
		endpoint, provider
	)))
}

/// True for an `http(s)` URL whose host is `localhost` or a loopback IP, with any port and path.
pub fn is_loopback_url(url: &str) -> bool {
	let Ok(parsed) = Url::parse(url) else {
		return false;
	};
	if !matches!(parsed.scheme(), "http" | "https") || !parsed.username().is_empty() {
		return false;
	}
	match parsed.host() {
		Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(Host::Ipv4(ip)) => ip.is_loopback(),
		Some(Host::Ipv6(ip)) => ip.is_loopback(),
		None => false,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_canonical_endpoints_pass() {
		assert!(validate_status_endpoint("across", ACROSS_STATUS_ENDPOINT).is_ok());
		assert!(validate_status_endpoint("lifi", LIFI_STATUS_ENDPOINT).is_ok());
	}

	#[test]
	fn test_cross_provider_and_foreign_hosts_fail() {
		assert!(validate_status_endpoint("across", LIFI_STATUS_ENDPOINT).is_err());
		assert!(validate_status_endpoint("across", "https://evil.example/api").is_err());
		assert!(validate_status_endpoint("across", "https://localhost.evil.example/").is_err());
		assert!(validate_status_endpoint("across", "https://127.0.0.1@evil.example/").is_err());
		assert!(validate_status_endpoint("across", "ftp://127.0.0.1/").is_err());
	}

	#[test]
	fn test_loopback_passes() {
		assert!(validate_status_endpoint("across", "http://127.0.0.1:8080/status").is_ok());
		assert!(validate_status_endpoint("lifi", "http://localhost/v1/status").is_ok());
		assert!(validate_status_endpoint("lifi", "http://[::1]:9000").is_ok());
		assert!(validate_status_endpoint("lifi", "http://LOCALHOST:3000/status").is_ok());
	}

	#[test]
	fn test_unparseable_loopback_lookalikes_fail() {
		assert!(!is_loopback_url("http://localhost:notaport/x"));
		assert!(!is_loopback_url("http://[::1/status"));
		assert!(!is_loopback_url("localhost:8080"));
		assert!(!is_loopback_url("http://user@127.0.0.1/"));
	}
}
