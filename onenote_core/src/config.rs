use std::path::PathBuf;

/// Default Azure app registration (Microsoft Graph PowerShell public client).
/// Works for delegated device-code sign-in without any app setup.
pub const DEFAULT_CLIENT_ID: &str = "14d82eec-204b-4c2f-b7e8-296a70dab67e";

/// Delegated Graph scopes requested during device-code sign-in.
pub const GRAPH_SCOPES: &[&str] = &[
    "Notes.Read.All",
    "Notes.ReadWrite.All",
    "User.Read",
    "Group.Read.All",
];

pub const KEYCHAIN_SERVICE: &str = "onenote-mcp";
pub const KEYCHAIN_ACCOUNT: &str = "graph-access-token";
pub const TOKEN_ENV_VAR: &str = "GRAPH_ACCESS_TOKEN";

/// Which backend `write` targets and `read` consults after the env override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    /// OS credential store, falling back to the token file.
    Keychain,
    /// Token file only.
    File,
    /// Environment variable only; writes are refused.
    Env,
}

impl StorageMode {
    /// Unrecognized values deliberately fall back to the keychain default.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => StorageMode::File,
            "env" => StorageMode::Env,
            _ => StorageMode::Keychain,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageMode::Keychain => "keychain",
            StorageMode::File => "file",
            StorageMode::Env => "env",
        }
    }
}

/// Process configuration, resolved once from the environment and passed
/// explicitly to everything that needs it.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_id_from_env: bool,
    pub scopes: Vec<String>,
    pub storage: StorageMode,
    pub token_file: PathBuf,
    pub token_env_var: String,
    pub log_level: String,
    pub console_logging: bool,
    pub log_file: PathBuf,
    pub keychain_service: String,
    pub keychain_account: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            client_id: DEFAULT_CLIENT_ID.to_string(),
            client_id_from_env: false,
            scopes: GRAPH_SCOPES.iter().map(|s| s.to_string()).collect(),
            storage: StorageMode::Keychain,
            token_file: default_token_file(),
            token_env_var: TOKEN_ENV_VAR.to_string(),
            log_level: "info".to_string(),
            console_logging: false,
            log_file: default_log_dir().join("server.log"),
            keychain_service: KEYCHAIN_SERVICE.to_string(),
            keychain_account: KEYCHAIN_ACCOUNT.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Config::default();
        if let Some(client_id) = non_empty_env("CLIENT_ID") {
            config.client_id = client_id;
            config.client_id_from_env = true;
        }
        if let Ok(raw) = std::env::var("ONENOTE_MCP_TOKEN_STORAGE") {
            config.storage = StorageMode::parse(&raw);
        }
        if let Some(path) = non_empty_env("ONENOTE_MCP_TOKEN_FILE") {
            config.token_file = PathBuf::from(path);
        }
        if let Some(level) = non_empty_env("ONENOTE_MCP_LOG_LEVEL") {
            config.log_level = level;
        }
        config.console_logging = env_flag("ONENOTE_MCP_CONSOLE_LOGGING");
        if let Some(path) = non_empty_env("ONENOTE_MCP_LOG_FILE") {
            config.log_file = PathBuf::from(path);
        }
        config
    }

    /// Whether the env override currently carries a token.
    pub fn env_token_set(&self) -> bool {
        non_empty_env(&self.token_env_var).is_some()
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

fn default_token_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("onenote-mcp")
        .join("access-token.json")
}

fn default_log_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        if let Some(home) = dirs::home_dir() {
            return home.join("Library").join("Logs").join("onenote-mcp");
        }
    }
    #[cfg(target_os = "windows")]
    {
        if let Some(local) = dirs::data_local_dir() {
            return local.join("onenote-mcp").join("logs");
        }
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        if let Some(home) = dirs::home_dir() {
            return home.join(".local").join("state").join("onenote-mcp");
        }
    }
    std::env::temp_dir().join("onenote-mcp")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_mode_parses_known_values() {
        assert_eq!(StorageMode::parse("file"), StorageMode::File);
        assert_eq!(StorageMode::parse(" ENV "), StorageMode::Env);
        assert_eq!(StorageMode::parse("keychain"), StorageMode::Keychain);
    }

    #[test]
    fn storage_mode_defaults_unknown_to_keychain() {
        assert_eq!(StorageMode::parse("vault"), StorageMode::Keychain);
        assert_eq!(StorageMode::parse(""), StorageMode::Keychain);
    }

    #[test]
    fn default_config_uses_public_client() {
        let config = Config::default();
        assert_eq!(config.client_id, DEFAULT_CLIENT_ID);
        assert!(!config.client_id_from_env);
        assert!(config.scopes.iter().any(|s| s == "Notes.ReadWrite.All"));
    }
}
