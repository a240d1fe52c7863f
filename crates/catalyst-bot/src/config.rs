use std::path::Path;

use anyhow::{Context, Result};
use catalyst_models::Settings;

/// Loads `Settings` from a TOML file, then overlays secrets from the
/// process environment (and a `.env` file, if present) so webhook URLs and
/// provider API keys never need to live in a config file checked into
/// source control (spec.md §6 environment variables).
pub fn load_settings(path: &Path) -> Result<Settings> {
    dotenvy::dotenv().ok();

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let mut settings: Settings =
        toml::from_str(&raw).with_context(|| format!("parsing config file {}", path.display()))?;

    if let Ok(webhook) = std::env::var("CATALYST_WEBHOOK_URL") {
        settings.dispatch.webhook_url = webhook;
    }
    if let Ok(admin_webhook) = std::env::var("CATALYST_ADMIN_WEBHOOK_URL") {
        settings.heartbeat.admin_webhook_url = admin_webhook;
    }
    if let Ok(user_agent) = std::env::var("CATALYST_SEC_USER_AGENT") {
        settings.feeds.sec_user_agent = user_agent;
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overlay_overrides_config_file_webhook() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("catalyst-bot.toml");
        std::fs::write(&config_path, "[dispatch]\nwebhook_url = \"https://file.example\"\n").unwrap();

        std::env::set_var("CATALYST_WEBHOOK_URL", "https://env.example");
        let settings = load_settings(&config_path).unwrap();
        std::env::remove_var("CATALYST_WEBHOOK_URL");

        assert_eq!(settings.dispatch.webhook_url, "https://env.example");
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = load_settings(Path::new("/nonexistent/catalyst-bot.toml"));
        assert!(result.is_err());
    }
}
