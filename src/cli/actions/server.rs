use crate::api;
use crate::cli::actions::Action;
use anyhow::{anyhow, Result};
use url::Url;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            notify_poll_interval,
        } => {
            let dsn = Url::parse(&dsn)?;

            if !matches!(dsn.scheme(), "postgres" | "postgresql") {
                return Err(anyhow!("DSN must use the postgres scheme"));
            }

            api::new(port, dsn.to_string(), notify_poll_interval).await?;
        }
    }

    Ok(())
}
