use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Deserialize, Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub jwt_secret: String,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    pub beaches_api: BeachesApiConfig,
    pub ckan: CkanConfig,

    /// Seconds between EPA sync runs. Zero disables the task.
    #[serde(default)]
    pub sync_interval_secs: u64,

    #[serde(default = "default_pdf_dpi")]
    pub pdf_dpi: u32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BeachesApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub cache_timeout_secs: u64,
    pub use_mock_data: bool,
}

impl Default for BeachesApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_beaches_api_base_url(),
            timeout_secs: 10,
            cache_timeout_secs: 3600,
            use_mock_data: false,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct CkanConfig {
    pub api_url: String,
    pub api_key: String,
    pub package_id: String,
}

impl Default for CkanConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            api_key: String::new(),
            package_id: default_ckan_package_id(),
        }
    }
}

// Partial config for layering. Field names double as env variable names
// (upper-cased by envy), e.g. BEACHES_API_USE_MOCK.
#[derive(Deserialize, Default, Debug)]
struct PartialServerConfig {
    database_url: Option<String>,
    jwt_secret: Option<String>,
    bind_address: Option<String>,
    data_dir: Option<String>,
    log_dir: Option<String>,
    beaches_api_base_url: Option<String>,
    beaches_api_timeout: Option<u64>,
    beaches_api_cache_timeout: Option<u64>,
    beaches_api_use_mock: Option<bool>,
    ckan_api_url: Option<String>,
    ckan_api_key: Option<String>,
    ckan_package_id: Option<String>,
    sync_interval_secs: Option<u64>,
    pdf_dpi: Option<u32>,
}

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_beaches_api_base_url() -> String {
    "https://data.epa.ie/bw/api/v1".to_string()
}

fn default_ckan_package_id() -> String {
    "bathing-water-posters".to_string()
}

fn default_pdf_dpi() -> u32 {
    300
}

impl ServerConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self, String> {
        dotenv::dotenv().ok();

        // 1. Load from file (optional)
        let file_config: PartialServerConfig = match config_path {
            Some(path_str) => {
                let path = Path::new(path_str);
                if path.exists() {
                    let contents = fs::read_to_string(path)
                        .map_err(|e| format!("Failed to read config file at {path:?}: {e}"))?;
                    Self::parse_toml(&contents)
                        .map_err(|e| format!("Failed to parse TOML from config file at {path:?}: {e}"))?
                } else {
                    PartialServerConfig::default()
                }
            }
            None => PartialServerConfig::default(),
        };

        // 2. Load from environment variables
        let env_config: PartialServerConfig = envy::from_env::<PartialServerConfig>()
            .map_err(|e| format!("Failed to load config from environment: {e}"))?;

        // 3. Merge: environment overrides file
        Self::merge(env_config, file_config)
    }

    fn parse_toml(contents: &str) -> Result<PartialServerConfig, toml::de::Error> {
        toml::from_str(contents)
    }

    fn merge(env: PartialServerConfig, file: PartialServerConfig) -> Result<Self, String> {
        let api_defaults = BeachesApiConfig::default();
        Ok(ServerConfig {
            database_url: env.database_url.or(file.database_url)
                .ok_or("DATABASE_URL is required")?,
            jwt_secret: env.jwt_secret.or(file.jwt_secret)
                .ok_or("JWT_SECRET is required")?,
            bind_address: env.bind_address.or(file.bind_address)
                .unwrap_or_else(default_bind_address),
            data_dir: env.data_dir.or(file.data_dir)
                .unwrap_or_else(default_data_dir),
            log_dir: env.log_dir.or(file.log_dir)
                .unwrap_or_else(default_log_dir),
            beaches_api: BeachesApiConfig {
                base_url: env.beaches_api_base_url.or(file.beaches_api_base_url)
                    .unwrap_or(api_defaults.base_url),
                timeout_secs: env.beaches_api_timeout.or(file.beaches_api_timeout)
                    .unwrap_or(api_defaults.timeout_secs),
                cache_timeout_secs: env.beaches_api_cache_timeout.or(file.beaches_api_cache_timeout)
                    .unwrap_or(api_defaults.cache_timeout_secs),
                use_mock_data: env.beaches_api_use_mock.or(file.beaches_api_use_mock)
                    .unwrap_or(api_defaults.use_mock_data),
            },
            ckan: CkanConfig {
                api_url: env.ckan_api_url.or(file.ckan_api_url).unwrap_or_default(),
                api_key: env.ckan_api_key.or(file.ckan_api_key).unwrap_or_default(),
                package_id: env.ckan_package_id.or(file.ckan_package_id)
                    .unwrap_or_else(default_ckan_package_id),
            },
            sync_interval_secs: env.sync_interval_secs.or(file.sync_interval_secs)
                .unwrap_or(0),
            pdf_dpi: env.pdf_dpi.or(file.pdf_dpi).unwrap_or_else(default_pdf_dpi),
        })
    }

    /// Directory generated poster and section PDFs are written under.
    pub fn media_root(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }
}

#[cfg(test)]
impl ServerConfig {
    pub fn for_tests(data_dir: &Path) -> Self {
        ServerConfig {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "test-secret".to_string(),
            bind_address: default_bind_address(),
            data_dir: data_dir.to_string_lossy().into_owned(),
            log_dir: default_log_dir(),
            beaches_api: BeachesApiConfig {
                use_mock_data: true,
                ..Default::default()
            },
            ckan: CkanConfig::default(),
            sync_interval_secs: 0,
            pdf_dpi: default_pdf_dpi(),
        }
    }
}
