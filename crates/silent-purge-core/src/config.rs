use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;

pub const DEFAULT_STORE_FILE_NAME: &str = "remove_silent.db";
pub const DEFAULT_FFMPEG_PATH: &str = "ffmpeg";
pub const DEFAULT_EXTENSIONS: [&str; 4] = [".rmvb", ".mp4", ".rm", ".avi"];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Name of the measurement store created inside the scanned root.
    pub store_file_name: String,
    pub ffmpeg_path: String,
    /// Lowercase file name suffixes that are in scope.
    pub extensions: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_file_name: DEFAULT_STORE_FILE_NAME.to_string(),
            ffmpeg_path: DEFAULT_FFMPEG_PATH.to_string(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Load `Config.*` from the working directory if present, then `SILENT_PURGE_*` variables.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(
            Environment::with_prefix("SILENT_PURGE")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("extensions"),
        )
        .build()?;
    builder.try_deserialize::<AppConfig>()
}
