use crate::cli::commands::content::{self, ContentCommands};
use crate::cli::commands::{auth, contacts, dashboard, services};
use crate::cli::AdminContext;
use crate::forms::EntityKind;
use crate::routes::Route;

/// Runs the command that renders the view at `path`
pub async fn handle(path: &str, ctx: &AdminContext) -> anyhow::Result<()> {
    let route: Route = path.parse().unwrap_or(Route::NotFound(path.to_string()));
    let route = ctx.enter(route)?;

    match route {
        Route::NotFound(path) => anyhow::bail!("No page at '{}'", path),
        Route::Auth => auth::handle(auth::AuthCommands::Status, ctx).await,
        Route::ForgotPassword => hint("fu-admin auth forgot-password <email>"),
        Route::VerifyOtp => hint("fu-admin auth verify-otp <email> <code>"),
        Route::ResetPassword => hint("fu-admin auth reset-password"),
        Route::Users => hint("fu-admin users create <name> <email>"),
        Route::Dashboard => dashboard::handle(ctx).await,
        Route::Services(None) => services::handle(services::ServiceCommands::List, ctx).await,
        Route::Services(Some(id)) => services::handle(services::ServiceCommands::Show { id }, ctx).await,
        Route::Contacts => contacts::handle(contacts::ContactCommands::List, ctx).await,
        section => match EntityKind::ALL.into_iter().find(|k| k.route() == section) {
            Some(kind) => content::handle(ContentCommands::Show { kind }, ctx).await,
            None => anyhow::bail!("No page at '{}'", section),
        },
    }
}

fn hint(command: &str) -> anyhow::Result<()> {
    println!("Run `{}`", command);
    Ok(())
}
