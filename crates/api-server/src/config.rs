//! Server configuration
//!
//! The runtime surface is environment-supplied only: the listening port and
//! the cross-origin allow-list.

/// Resolved server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// `None` allows any origin.
    pub allowed_origins: Option<Vec<String>>,
}

impl ServerConfig {
    /// Read `PORT` and `WS_CORS_ORIGIN` from the environment
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(3001);

        Self {
            port,
            allowed_origins: parse_origins(std::env::var("WS_CORS_ORIGIN").ok()),
        }
    }
}

/// Split a comma-separated origin list. Blank entries are dropped; an empty
/// result means any origin.
fn parse_origins(value: Option<String>) -> Option<Vec<String>> {
    let value = value?;
    let origins: Vec<String> = value
        .split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect();

    if origins.is_empty() {
        None
    } else {
        Some(origins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_splits_and_trims() {
        let origins = parse_origins(Some(
            "http://localhost:3000, https://board.example.com".to_string(),
        ));
        assert_eq!(
            origins,
            Some(vec![
                "http://localhost:3000".to_string(),
                "https://board.example.com".to_string(),
            ])
        );
    }

    #[test]
    fn test_parse_origins_empty_means_any() {
        assert_eq!(parse_origins(None), None);
        assert_eq!(parse_origins(Some("".to_string())), None);
        assert_eq!(parse_origins(Some(" , ,".to_string())), None);
    }
}
