use anyhow::Result;
use vetclinic::cli::{actions, start};

#[tokio::main]
async fn main() -> Result<()> {
    let (action, globals) = start()?;

    actions::handle(action, &globals).await?;

    Ok(())
}
