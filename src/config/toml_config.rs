use crate::adapters::youtube::DEFAULT_ENDPOINT;
use crate::utils::error::{MashupError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_WORK_DIR: &str = "./mashup-work";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MashupConfig {
    pub youtube: YouTubeConfig,
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub workspace: WorkspaceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTubeConfig {
    pub api_key: String,
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: Option<u16>,
    pub username: String,
    pub password: String,
    pub from: String,
}

impl SmtpConfig {
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_SMTP_PORT)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_yt_dlp")]
    pub yt_dlp: String,
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: String,
    #[serde(default = "default_ffprobe")]
    pub ffprobe: String,
}

fn default_yt_dlp() -> String {
    "yt-dlp".to_string()
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe() -> String {
    "ffprobe".to_string()
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            yt_dlp: default_yt_dlp(),
            ffmpeg: default_ffmpeg(),
            ffprobe: default_ffprobe(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    pub work_dir: Option<PathBuf>,
}

impl MashupConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);

        toml::from_str(&processed).map_err(|e| MashupError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SMTP_PASSWORD})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static VAR_RE: OnceLock<Regex> = OnceLock::new();
        let re = VAR_RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn endpoint(&self) -> &str {
        self.youtube.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    pub fn work_dir(&self) -> PathBuf {
        self.workspace
            .work_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_WORK_DIR))
    }
}

impl Validate for MashupConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("youtube.api_key", &self.youtube.api_key)?;
        validation::validate_resolved("youtube.api_key", &self.youtube.api_key)?;
        validation::validate_url("youtube.endpoint", self.endpoint())?;

        validation::validate_non_empty_string("smtp.host", &self.smtp.host)?;
        validation::validate_positive_number("smtp.port", u64::from(self.smtp.port()), 1)?;
        validation::validate_resolved("smtp.username", &self.smtp.username)?;
        validation::validate_resolved("smtp.password", &self.smtp.password)?;
        validation::validate_email("smtp.from", &self.smtp.from)?;

        for (field, value) in [
            ("tools.yt_dlp", &self.tools.yt_dlp),
            ("tools.ffmpeg", &self.tools.ffmpeg),
            ("tools.ffprobe", &self.tools.ffprobe),
        ] {
            validation::validate_non_empty_string(field, value)?;
        }

        let work_dir = self.work_dir();
        validation::validate_path("workspace.work_dir", &work_dir.to_string_lossy())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[youtube]
api_key = "abc123"

[smtp]
host = "smtp.example.com"
username = "bot"
password = "secret"
from = "bot@example.com"
"#;

    #[test]
    fn test_parse_basic_config_with_defaults() {
        let config = MashupConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.youtube.api_key, "abc123");
        assert_eq!(config.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(config.smtp.port(), 587);
        assert_eq!(config.tools.ffmpeg, "ffmpeg");
        assert_eq!(config.tools.yt_dlp, "yt-dlp");
        assert_eq!(config.work_dir(), PathBuf::from(DEFAULT_WORK_DIR));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("YT_MASHUP_TEST_SMTP_PASSWORD", "from-env");

        let toml_content = r#"
[youtube]
api_key = "k"

[smtp]
host = "smtp.example.com"
port = 2525
username = "bot"
password = "${YT_MASHUP_TEST_SMTP_PASSWORD}"
from = "bot@example.com"

[tools]
ffmpeg = "/opt/ffmpeg/bin/ffmpeg"

[workspace]
work_dir = "/tmp/mashup"
"#;

        let config = MashupConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.smtp.password, "from-env");
        assert_eq!(config.smtp.port(), 2525);
        assert_eq!(config.tools.ffmpeg, "/opt/ffmpeg/bin/ffmpeg");
        assert_eq!(config.tools.ffprobe, "ffprobe");
        assert_eq!(config.work_dir(), PathBuf::from("/tmp/mashup"));

        std::env::remove_var("YT_MASHUP_TEST_SMTP_PASSWORD");
    }

    #[test]
    fn test_unresolved_secret_fails_validation() {
        let toml_content = BASIC.replace("\"abc123\"", "\"${YT_MASHUP_TEST_UNSET_KEY}\"");

        let config = MashupConfig::from_toml_str(&toml_content).unwrap();
        assert_eq!(config.youtube.api_key, "${YT_MASHUP_TEST_UNSET_KEY}");
        assert!(matches!(
            config.validate(),
            Err(MashupError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_invalid_endpoint_fails_validation() {
        let toml_content = BASIC.replace(
            "api_key = \"abc123\"",
            "api_key = \"abc123\"\nendpoint = \"ftp://example.com\"",
        );

        let config = MashupConfig::from_toml_str(&toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_section_is_a_config_error() {
        let err = MashupConfig::from_toml_str("[youtube]\napi_key = \"k\"\n").unwrap_err();
        assert!(matches!(err, MashupError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = MashupConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.smtp.host, "smtp.example.com");
    }
}
