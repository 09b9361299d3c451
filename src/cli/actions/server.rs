use crate::cli::actions::Action;
use crate::eduerp::new;
use anyhow::Result;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            token_secret,
        } => {
            new(port, dsn, &token_secret).await?;
        }
    }

    Ok(())
}
