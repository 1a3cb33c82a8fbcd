use crate::cli::AdminContext;
use crate::cli::OutputFormat;
use crate::dashboard::summary;
use crate::forms::EntityKind;
use crate::routes::Route;

pub async fn handle(ctx: &AdminContext) -> anyhow::Result<()> {
    ctx.enter(Route::Dashboard)?;
    let cards = ctx.settle(summary(&ctx.store).await)?;

    match ctx.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&cards)?);
        }
        OutputFormat::Text => {
            for (card, kind) in cards.iter().zip(EntityKind::ALL) {
                println!("{:<16} {:<14} {}", card.title, card.status(kind.is_singleton()), card.route);
            }
        }
    }
    Ok(())
}
