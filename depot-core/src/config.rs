//! Optional server configuration at `<root>/depot.yaml`.
//!
//! ```yaml
//! bind: 127.0.0.1
//! port: 8888
//! build_script: /opt/depot/build.sh
//! ```
//!
//! Every key is optional. A missing or empty file means all defaults; a
//! malformed file is an error.

use std::io::ErrorKind;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{io_err, RegistryError};
use crate::paths::Layout;

pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8888;

/// Server settings as written in `depot.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Relative paths resolve against the storage root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_script: Option<PathBuf>,
}

/// Fully-resolved server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub build_script: PathBuf,
}

impl ServerConfig {
    /// Defaults for `layout`, overlaid with `file`.
    pub fn resolve(layout: &Layout, file: FileConfig) -> Self {
        let build_script = match file.build_script {
            Some(path) if path.is_relative() => layout.root().join(path),
            Some(path) => path,
            None => layout.default_build_script(),
        };
        Self {
            bind: file.bind.unwrap_or_else(|| DEFAULT_BIND.to_string()),
            port: file.port.unwrap_or(DEFAULT_PORT),
            build_script,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

/// Read `<root>/depot.yaml`, or defaults when absent.
pub fn load_file_config_at(layout: &Layout) -> Result<FileConfig, RegistryError> {
    let path = layout.config_path();
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(FileConfig::default()),
        Err(err) => return Err(io_err(&path, err)),
    };
    if contents.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    serde_yaml::from_str(&contents).map_err(|e| RegistryError::ConfigParse { path, source: e })
}

/// Load and resolve the server config for `layout`.
pub fn load_server_config_at(layout: &Layout) -> Result<ServerConfig, RegistryError> {
    Ok(ServerConfig::resolve(layout, load_file_config_at(layout)?))
}
