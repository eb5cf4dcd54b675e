use crate::cli::args::CardArgs;
use crate::cli::commands::{index_cards, Context};
use crate::error::Result;
use crate::output;
use crate::progress::Spinner;
use crate::router::CardQuery;

/// Execute a single-group card command (lore, info, status, ruling, ...)
pub async fn execute(query: CardQuery, args: CardArgs, context: &Context) -> Result<()> {
    let name = args.name();
    let repo = context.repository()?;
    let progress = context.progress();

    // Offline lookups go straight to the database
    if repo.is_online() {
        index_cards(&repo, progress.clone()).await?;
    }

    let spinner = Spinner::new(progress, &format!("Loading '{}'...", name));
    let data = repo.get(query, &name).await?;
    spinner.finish_and_clear();

    let output = output::format_card_data(&name, query, &data, context.format)?;
    println!("{}", output);
    Ok(())
}
