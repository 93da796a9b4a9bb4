//! Global configuration.
//!
//! Loaded once from `rwf.toml` in the working directory. If the file
//! is missing or can't be parsed, defaults are used.
use once_cell::sync::OnceCell;
use std::fs::read_to_string;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

static CONFIG: OnceCell<Config> = OnceCell::new();

#[derive(Error, Debug)]
pub enum Error {
    #[error("config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("config file not found")]
    Io(#[from] std::io::Error),

    #[error("config not found")]
    NoConfig,
}

/// Global configuration.
#[derive(Debug, Clone)]
pub struct Config {
    path: Option<PathBuf>,
    pub tty: bool,
    pub http: Http,
    pub forms: Forms,
}

#[derive(Debug, Clone)]
pub struct Http {
    pub header_max_size: usize,
    /// Requests with a larger `Content-Length` are rejected before the body is read.
    pub body_max_size: usize,
}

/// Form handling and file upload settings.
#[derive(Debug, Clone)]
pub struct Forms {
    /// Where uploaded files are stored. The OS temp directory is used if not set.
    pub tmp_dir: Option<PathBuf>,
    /// Largest file part accepted by the default part policy.
    pub max_file_size: usize,
    /// Largest non-file input accepted in a multipart body.
    pub max_form_input_size: usize,
    /// Maximum number of non-file inputs in a multipart body.
    pub max_form_inputs: usize,
    /// Include non-file multipart inputs in the request parameters.
    pub process_form_inputs: bool,
}

impl Default for Http {
    fn default() -> Self {
        Self {
            header_max_size: 16 * 1024,     // 16KB
            body_max_size: 8 * 1024 * 1024, // 8MB
        }
    }
}

impl Default for Forms {
    fn default() -> Self {
        Self {
            tmp_dir: None,
            max_file_size: 128 * 1024,
            max_form_input_size: 128 * 1024,
            max_form_inputs: 10,
            process_form_inputs: true,
        }
    }
}

impl Forms {
    fn from_config_file(&mut self, file: &FormsConfig) {
        if let Some(tmp_dir) = &file.tmp_dir {
            self.tmp_dir = Some(tmp_dir.clone());
        }

        self.max_file_size = file.max_file_size;
        self.max_form_input_size = file.max_form_input_size;
        self.max_form_inputs = file.max_form_inputs;
        self.process_form_inputs = file.process_form_inputs;
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: None,
            tty: std::io::stderr().is_terminal(),
            http: Http::default(),
            forms: Forms::default(),
        }
    }
}

impl Config {
    /// Load configuration from the first config file found in the working directory.
    pub fn load() -> Result<Config, Error> {
        for name in ["rwf.toml", "Rwf.toml"] {
            let path = PathBuf::from(name);
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Err(Error::NoConfig)
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Config, Error> {
        let path = path.as_ref();
        let config_file = ConfigFile::load(path)?;
        let mut config = Config::default();

        config.path = Some(path.to_owned());
        config.http.header_max_size = config_file.general.header_max_size;
        config.http.body_max_size = config_file.general.body_max_size;
        config
            .forms
            .from_config_file(&config_file.forms.unwrap_or_default());

        Ok(config)
    }

    pub fn get() -> &'static Config {
        get_config()
    }

    /// Path to the file this config was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Print where the configuration came from.
    pub fn log_info(&self) {
        match self.path() {
            Some(path) => info!("Configuration loaded from \"{}\"", path.display()),
            None => info!("Configuration file missing, using defaults"),
        }
    }
}

pub fn get_config() -> &'static Config {
    CONFIG.get_or_init(|| Config::load().unwrap_or_default())
}

#[derive(Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    general: General,
    forms: Option<FormsConfig>,
}

impl ConfigFile {
    fn load(path: impl AsRef<Path>) -> Result<ConfigFile, Error> {
        let file = read_to_string(path)?;
        let config: Self = toml::from_str(&file)?;

        Ok(config)
    }
}

#[derive(Serialize, Deserialize)]
struct General {
    #[serde(default = "General::default_header_max_size")]
    header_max_size: usize,
    #[serde(default = "General::default_body_max_size")]
    body_max_size: usize,
}

impl Default for General {
    fn default() -> Self {
        Self {
            header_max_size: Self::default_header_max_size(),
            body_max_size: Self::default_body_max_size(),
        }
    }
}

impl General {
    fn default_header_max_size() -> usize {
        Http::default().header_max_size
    }

    fn default_body_max_size() -> usize {
        Http::default().body_max_size
    }
}

#[derive(Serialize, Deserialize)]
struct FormsConfig {
    tmp_dir: Option<PathBuf>,
    #[serde(default = "FormsConfig::default_max_size")]
    max_file_size: usize,
    #[serde(default = "FormsConfig::default_max_size")]
    max_form_input_size: usize,
    #[serde(default = "FormsConfig::default_max_form_inputs")]
    max_form_inputs: usize,
    #[serde(default = "FormsConfig::default_process_form_inputs")]
    process_form_inputs: bool,
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            tmp_dir: None,
            max_file_size: Self::default_max_size(),
            max_form_input_size: Self::default_max_size(),
            max_form_inputs: Self::default_max_form_inputs(),
            process_form_inputs: Self::default_process_form_inputs(),
        }
    }
}

impl FormsConfig {
    fn default_max_size() -> usize {
        128 * 1024
    }

    fn default_max_form_inputs() -> usize {
        10
    }

    fn default_process_form_inputs() -> bool {
        true
    }
}
