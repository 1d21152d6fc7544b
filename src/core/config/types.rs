use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Typed view of `config.yml`. Every section falls back to its defaults, so
/// an empty or partial file is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub index: IndexConfig,
    pub openai: OpenAiConfig,
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub title: String,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5001,
            title: "Lecture Chat".to_string(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Directory holding one sub-directory per company.
    pub root: PathBuf,
    pub company: String,
    pub directory: String,
    pub top_k: usize,
}

impl IndexConfig {
    /// `<root>/<company>/<directory>`
    pub fn index_dir(&self) -> PathBuf {
        self.root.join(&self.company).join(&self.directory)
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./annual_reports/Transcripts"),
            company: "Lec1".to_string(),
            directory: "faiss_index".to_string(),
            top_k: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub chat_model: String,
    pub temperature: f64,
    pub embedding_model: String,
    /// Seconds. Unset means requests may block indefinitely.
    pub request_timeout_secs: Option<u64>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            chat_model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            embedding_model: "text-embedding-ada-002".to_string(),
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub color_primary: String,
    pub color_secondary: String,
    pub color_background_dark: String,
    pub color_paper_dark: String,
    pub dark_mode: bool,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            color_primary: "#7476C3".to_string(),
            color_secondary: "#7476C3".to_string(),
            color_background_dark: "#131314".to_string(),
            color_paper_dark: "#1C1C1D".to_string(),
            dark_mode: true,
        }
    }
}
