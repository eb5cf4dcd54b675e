use ygodb::cli;
use ygodb::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    cli::Cli::run().await
}
