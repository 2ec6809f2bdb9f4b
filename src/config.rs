use log::warn;
use rocket::figment::Figment;
use serde::Deserialize;

use crate::security::nonce::generate_secret;

/// Runtime configuration, read from the `seo` table of Rocket's figment
/// (`Rocket.toml` `[default.seo]`, or `ROCKET_SEO='{db_path="..."}'`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub db_path: String,
    /// Bearer token for the admin routes. Admin routes refuse every request
    /// while it is unset.
    pub admin_token: Option<String>,
    pub nonce_secret: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            db_path: "website/db/seo.db".to_string(),
            admin_token: None,
            nonce_secret: None,
        }
    }
}

impl AppConfig {
    pub fn from_figment(figment: &Figment) -> Self {
        if !figment.contains("seo") {
            return AppConfig::default();
        }
        match figment.extract_inner::<AppConfig>("seo") {
            Ok(c) => c,
            Err(e) => {
                warn!("Invalid [seo] configuration, using defaults: {}", e);
                AppConfig::default()
            }
        }
    }

    /// Configured nonce secret, or a fresh random one.
    pub fn nonce_secret_or_generate(&self) -> String {
        match self.nonce_secret.as_deref() {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => {
                warn!("No seo.nonce_secret configured; edit forms will not survive a restart");
                generate_secret()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket::figment::providers::{Format, Toml};

    #[test]
    fn defaults_without_seo_table() {
        let figment = Figment::new();
        let c = AppConfig::from_figment(&figment);
        assert_eq!(c.db_path, "website/db/seo.db");
        assert!(c.admin_token.is_none());
    }

    #[test]
    fn reads_seo_table() {
        let figment = Figment::new().merge(Toml::string(
            r#"
            [seo]
            db_path = "/tmp/x.db"
            admin_token = "t0k"
            "#,
        ));
        let c = AppConfig::from_figment(&figment);
        assert_eq!(c.db_path, "/tmp/x.db");
        assert_eq!(c.admin_token.as_deref(), Some("t0k"));
        assert!(c.nonce_secret.is_none());
    }

    #[test]
    fn configured_secret_is_kept() {
        let c = AppConfig {
            nonce_secret: Some("abc".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(c.nonce_secret_or_generate(), "abc");
        assert_eq!(AppConfig::default().nonce_secret_or_generate().len(), 64);
    }
}
