//! Instance address handling

use url::Url;

use crate::errors::ClientError;

/// Turn a user-supplied instance address into a base URL.
///
/// The scheme is optional and defaults to `http`; any other explicit scheme is
/// rejected. The address names a service root, so a query or fragment is
/// rejected too.
pub fn normalize_instance(instance: &str) -> Result<Url, ClientError> {
    let trimmed = instance.trim();
    if trimmed.is_empty() {
        return Err(ClientError::Address("instance address is empty".to_string()));
    }

    let with_scheme = match trimmed.split_once("://") {
        Some((scheme, _)) => {
            if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
                return Err(ClientError::Address(format!(
                    "{}: unsupported scheme '{}'",
                    instance, scheme
                )));
            }
            trimmed.to_string()
        }
        None => {
            check_authority(instance, trimmed)?;
            format!("http://{}", trimmed)
        }
    };

    let url = Url::parse(&with_scheme)
        .map_err(|e| ClientError::Address(format!("{}: {}", instance, e)))?;
    if url.host_str().map_or(true, str::is_empty) {
        return Err(ClientError::Address(format!("{}: missing host", instance)));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ClientError::Address(format!(
            "{}: query and fragment are not allowed",
            instance
        )));
    }

    Ok(url)
}

/// A scheme-less address must start with `host[:port]`; this catches mangled
/// schemes such as `https:/host`, which would otherwise parse as a host named
/// `https`.
fn check_authority(instance: &str, address: &str) -> Result<(), ClientError> {
    let authority = address
        .split(|c| c == '/' || c == '?' || c == '#')
        .next()
        .unwrap_or_default();

    // Bracketed IPv6 literal without a port
    if authority.ends_with(']') {
        return Ok(());
    }

    match authority.rsplit_once(':') {
        Some((_, port)) if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) => {
            Err(ClientError::Address(format!(
                "{}: invalid port '{}'",
                instance, port
            )))
        }
        _ => Ok(()),
    }
}

/// Append an operation path to the base URL, keeping any base path prefix.
pub fn operation_url(base: &Url, path: &str) -> Result<Url, ClientError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ClientError::Address(format!("{}: cannot carry a path", base)))?
        .pop_if_empty()
        .extend(path.split('/').filter(|segment| !segment.is_empty()));
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_is_added_when_missing() {
        let url = normalize_instance("deployer.internal:8080").unwrap();
        assert_eq!(url.as_str(), "http://deployer.internal:8080/");
    }

    #[test]
    fn test_explicit_scheme_is_kept() {
        let url = normalize_instance(" https://deployer.example.com ").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("deployer.example.com"));
    }

    #[test]
    fn test_malformed_addresses_fail() {
        assert!(matches!(normalize_instance(""), Err(ClientError::Address(_))));
        assert!(matches!(normalize_instance("   "), Err(ClientError::Address(_))));
        assert!(matches!(
            normalize_instance("http://"),
            Err(ClientError::Address(_))
        ));
        assert!(matches!(
            normalize_instance("host:notaport"),
            Err(ClientError::Address(_))
        ));
    }

    #[test]
    fn test_foreign_and_mangled_schemes_fail() {
        for address in [
            "ftp://host",
            "ws://host:8080",
            "https:/host",
            "http:host",
            "https:",
            "localhost:",
        ] {
            assert!(
                matches!(normalize_instance(address), Err(ClientError::Address(_))),
                "{} should be rejected",
                address
            );
        }
    }

    #[test]
    fn test_query_and_fragment_fail() {
        for address in [
            "localhost:8080/?x=1",
            "http://localhost:8080?x=1",
            "localhost:8080/#top",
        ] {
            assert!(
                matches!(normalize_instance(address), Err(ClientError::Address(_))),
                "{} should be rejected",
                address
            );
        }
    }

    #[test]
    fn test_ipv6_and_uppercase_scheme_are_accepted() {
        let url = normalize_instance("[::1]:8080").unwrap();
        assert_eq!(url.as_str(), "http://[::1]:8080/");

        let url = normalize_instance("[::1]").unwrap();
        assert_eq!(url.port(), None);

        let url = normalize_instance("HTTPS://Deployer.Example.com").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("deployer.example.com"));
    }

    #[test]
    fn test_operation_url_keeps_base_prefix() {
        let base = normalize_instance("localhost:9000/api/").unwrap();
        let url = operation_url(&base, "/kfctl/apps/v1alpha1/create").unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/api/kfctl/apps/v1alpha1/create");

        let bare = normalize_instance("localhost:9000").unwrap();
        let url = operation_url(&bare, "kfctl/apps/v1alpha1/get").unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/kfctl/apps/v1alpha1/get");

        let prefixed = normalize_instance("localhost:9000/api").unwrap();
        let url = operation_url(&prefixed, "/kfctl/apps/v1alpha1/create").unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/api/kfctl/apps/v1alpha1/create");
        assert_eq!(url.query(), None);
    }
}
