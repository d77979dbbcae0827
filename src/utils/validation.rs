use crate::utils::error::{MashupError, Result};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: &str, reason: impl Into<String>) -> MashupError {
    MashupError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(invalid(
                field_name,
                url_str,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(invalid(
            field_name,
            url_str,
            format!("Invalid URL format: {}", e),
        )),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            &value.to_string(),
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            &value.to_string(),
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_file_extension(field_name: &str, path: &Path, allowed: &[&str]) -> Result<()> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if !allowed.iter().any(|a| ext.eq_ignore_ascii_case(a)) {
        return Err(invalid(
            field_name,
            &path.display().to_string(),
            format!("File extension must be one of: {}", allowed.join(", ")),
        ));
    }
    Ok(())
}

/// 粗略檢查 email 格式，真正的解析交給 lettre
pub fn validate_email(field_name: &str, value: &str) -> Result<()> {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    });

    if !re.is_match(value.trim()) {
        return Err(invalid(field_name, value, "Not a valid email address"));
    }
    Ok(())
}

/// 環境變數替換失敗時會留下 `${VAR}`，視為缺值
pub fn validate_resolved(field_name: &str, value: &str) -> Result<()> {
    if value.contains("${") {
        return Err(MashupError::MissingConfigError {
            field: format!("{} (unresolved placeholder {})", field_name, value),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("youtube.endpoint", "https://example.com").is_ok());
        assert!(validate_url("youtube.endpoint", "http://example.com").is_ok());
        assert!(validate_url("youtube.endpoint", "").is_err());
        assert!(validate_url("youtube.endpoint", "invalid-url").is_err());
        assert!(validate_url("youtube.endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("count", 1u32, 1, 50).is_ok());
        assert!(validate_range("count", 50u32, 1, 50).is_ok());
        assert!(validate_range("count", 0u32, 1, 50).is_err());
        assert!(validate_range("count", 51u32, 1, 50).is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension("output", Path::new("out.mp3"), &["mp3"]).is_ok());
        assert!(validate_file_extension("output", Path::new("OUT.MP3"), &["mp3"]).is_ok());
        assert!(validate_file_extension("output", Path::new("out"), &["mp3"]).is_err());
        assert!(validate_file_extension("output", Path::new("out.wav"), &["mp3"]).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("email", "someone@example.com").is_ok());
        assert!(validate_email("email", "no-at-sign.example.com").is_err());
        assert!(validate_email("email", "two@@example.com").is_err());
        assert!(validate_email("email", "").is_err());
    }

    #[test]
    fn test_validate_resolved_flags_placeholders() {
        assert!(validate_resolved("smtp.password", "hunter2").is_ok());
        let err = validate_resolved("smtp.password", "${SMTP_PASSWORD}").unwrap_err();
        assert!(matches!(err, MashupError::MissingConfigError { .. }));
    }

    #[test]
    fn test_validate_path_and_strings() {
        assert!(validate_path("work_dir", "./work").is_ok());
        assert!(validate_path("work_dir", "").is_err());
        assert!(validate_path("work_dir", "bad\0path").is_err());
        assert!(validate_non_empty_string("singer", "   ").is_err());
        assert!(validate_positive_number("duration", 0, 1).is_err());
    }
}
