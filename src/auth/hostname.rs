//! Hostname normalization shared by cache keys and config file lookups

use crate::constants::hub;

/// Normalize a registry hostname for matching
///
/// Lower-cases, strips an `http://`/`https://` scheme and any path, drops the
/// default port, and folds the Docker Hub aliases into one name.
pub fn normalize(hostname: &str) -> String {
    let lowered = hostname.trim().to_ascii_lowercase();

    let (plain_http, rest) = if let Some(rest) = lowered.strip_prefix("https://") {
        (false, rest)
    } else if let Some(rest) = lowered.strip_prefix("http://") {
        (true, rest)
    } else {
        (false, lowered.as_str())
    };

    let host = rest.split('/').next().unwrap_or_default();

    let host = match host.rsplit_once(':') {
        Some((name, "443")) if !plain_http => name,
        Some((name, "80")) if plain_http => name,
        _ => host,
    };

    if hub::ALIASES.contains(&host) {
        return hub::HOSTNAME.to_string();
    }

    host.to_string()
}

/// Server URL handed to a credential helper for a normalized hostname
pub fn helper_server_url(hostname: &str) -> &str {
    if hostname == hub::HOSTNAME {
        hub::SERVER_URL
    } else {
        hostname
    }
}

/// Extract the registry hostname from an image reference
pub fn extract_registry(image_ref: &str) -> &str {
    // - docker.io/library/ubuntu:latest -> docker.io
    // - gcr.io/project/image:tag -> gcr.io
    // - localhost:5000/image -> localhost:5000
    // - ubuntu:latest -> index.docker.io (implicit)
    let image_ref = image_ref.split('@').next().unwrap_or(image_ref);

    if let Some((registry_part, _)) = image_ref.split_once('/') {
        if registry_part.contains('.')
            || registry_part.contains(':')
            || registry_part == "localhost"
        {
            return registry_part;
        }
    }

    hub::HOSTNAME
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_case_and_whitespace() {
        assert_eq!(normalize("  Registry.Example.COM "), "registry.example.com");
    }

    #[test]
    fn test_normalize_strips_scheme_and_path() {
        assert_eq!(normalize("https://ghcr.io"), "ghcr.io");
        assert_eq!(normalize("https://ghcr.io/v2/"), "ghcr.io");
        assert_eq!(normalize("http://localhost:5000/v1/"), "localhost:5000");
    }

    #[test]
    fn test_normalize_strips_default_port() {
        assert_eq!(normalize("registry.example.com:443"), "registry.example.com");
        assert_eq!(normalize("https://registry.example.com:443"), "registry.example.com");
        assert_eq!(normalize("http://registry.example.com:80"), "registry.example.com");
        // 80 is only the default for plain http
        assert_eq!(normalize("registry.example.com:80"), "registry.example.com:80");
        assert_eq!(normalize("http://registry.example.com:443"), "registry.example.com:443");
        assert_eq!(normalize("localhost:5000"), "localhost:5000");
    }

    #[test]
    fn test_normalize_docker_hub_aliases() {
        assert_eq!(normalize("docker.io"), "index.docker.io");
        assert_eq!(normalize("registry-1.docker.io"), "index.docker.io");
        assert_eq!(normalize("https://index.docker.io/v1/"), "index.docker.io");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for host in ["https://Docker.io/v1/", "ghcr.io:443", "localhost:5000", ""] {
            let once = normalize(host);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn test_helper_server_url() {
        assert_eq!(helper_server_url("index.docker.io"), "https://index.docker.io/v1/");
        assert_eq!(helper_server_url("ghcr.io"), "ghcr.io");
    }

    #[test]
    fn test_extract_registry() {
        assert_eq!(extract_registry("docker.io/library/ubuntu:latest"), "docker.io");
        assert_eq!(extract_registry("gcr.io/project/image:tag"), "gcr.io");
        assert_eq!(extract_registry("localhost:5000/image"), "localhost:5000");
        assert_eq!(extract_registry("localhost/image"), "localhost");
        assert_eq!(extract_registry("ubuntu:latest"), "index.docker.io");
        assert_eq!(extract_registry("user/image:tag"), "index.docker.io");
        assert_eq!(
            extract_registry("ghcr.io/owner/repo@sha256:abcd"),
            "ghcr.io"
        );
    }
}
