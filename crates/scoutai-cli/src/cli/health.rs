//! Handler for the `health` command.

use anyhow::Result;

use super::output;
use super::session::Session;

/// Execute the health command.
pub async fn execute(session: &Session) -> Result<()> {
    let api = session.api()?;
    output::section("API");
    output::key_value("Base URL", api.base_url());
    output::key_value(
        "Session",
        if session.config.credentials.session_cookie.is_some() {
            "configured"
        } else {
            "none"
        },
    );

    match api.health_check().await {
        Ok(health) => {
            output::key_value("Status", &health.status);
            if let Some(db) = &health.database {
                output::key_value("Database", db);
            }
            if let Some(message) = &health.message {
                output::key_value("Message", message);
            }
            if health.is_healthy() {
                output::ok("backend is healthy");
            } else {
                output::warn("backend reports a problem");
            }
        }
        Err(e) => output::warn(&format!("backend unreachable: {e}")),
    }
    Ok(())
}
