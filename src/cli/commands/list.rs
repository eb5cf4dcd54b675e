use crate::cli::args::ListArgs;
use crate::cli::commands::{index_cards, Context};
use crate::error::Result;
use crate::output;

/// Execute list command
pub async fn execute(args: ListArgs, context: &Context) -> Result<()> {
    let repo = context.repository()?;
    index_cards(&repo, context.progress()).await?;

    let mut names = repo.index().card_names().await;
    if let Some(needle) = args.contains.as_deref().map(str::to_lowercase) {
        names.retain(|name| name.to_lowercase().contains(&needle));
    }
    let total = names.len();
    if let Some(limit) = args.limit {
        names.truncate(limit);
    }

    if names.is_empty() {
        println!("No cards found.");
        return Ok(());
    }

    let output = output::format_card_names(&names, total, repo.current_source(), context.format)?;
    println!("{}", output);
    Ok(())
}
