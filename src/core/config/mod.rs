pub mod credentials;
pub mod paths;
pub mod service;
pub mod types;
pub mod validation;

pub use credentials::{resolve_api_key, API_KEY_ENV};
pub use paths::AppPaths;
pub use service::{apply_port_override, ConfigError, ConfigService, PORT_ENV};
pub use types::{AppConfig, IndexConfig, OpenAiConfig, ServerConfig, ThemeConfig};
