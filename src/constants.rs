/// Environment variables read by the environment provider
pub mod env {
    /// Registry username, paired with [`PASSWORD`]
    pub const USERNAME: &str = "DOCKER_REGISTRY_USER";

    /// Registry password, paired with [`USERNAME`]
    pub const PASSWORD: &str = "DOCKER_REGISTRY_PASSWORD";

    /// Base64 encoded `username:password`
    pub const AUTH: &str = "DOCKER_REGISTRY_AUTH";
}

/// Docker config file locations
pub mod docker_config {
    /// Directory holding `config.json`
    pub const DOCKER_CONFIG: &str = "DOCKER_CONFIG";

    /// Podman/skopeo style auth file
    pub const REGISTRY_AUTH_FILE: &str = "REGISTRY_AUTH_FILE";

    /// Runtime dir holding `containers/auth.json`
    pub const XDG_RUNTIME_DIR: &str = "XDG_RUNTIME_DIR";

    pub const FILE_NAME: &str = "config.json";
}

/// Properties file keys and location
pub mod properties {
    /// Default file name, relative to the home directory
    pub const FILE_NAME: &str = ".dockauth.properties";

    pub const USERNAME: &str = "registry.username";
    pub const PASSWORD: &str = "registry.password";
    pub const AUTH: &str = "registry.auth";
    pub const IDENTITY_TOKEN: &str = "registry.identitytoken";
}

/// Docker credential helper protocol
pub mod helper {
    /// Every helper program is named `docker-credential-<name>`
    pub const PROGRAM_PREFIX: &str = "docker-credential-";

    /// Username a helper reports when the secret is an identity token
    pub const TOKEN_USERNAME: &str = "<token>";

    /// Message helpers print when they hold nothing for the server
    pub const NOT_FOUND: &str = "credentials not found";

    /// Default subprocess timeout in seconds
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
}

/// Docker Hub naming
pub mod hub {
    /// Canonical hostname used as the cache key
    pub const HOSTNAME: &str = "index.docker.io";

    /// Hostnames that all mean Docker Hub
    pub const ALIASES: &[&str] = &["docker.io", "index.docker.io", "registry-1.docker.io"];

    /// Server URL Docker stores Hub credentials under
    pub const SERVER_URL: &str = "https://index.docker.io/v1/";
}
