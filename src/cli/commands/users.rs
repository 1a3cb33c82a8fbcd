use clap::Subcommand;
use serde_json::json;

use crate::auth::NewUser;
use crate::cli::utils::{output_success, prompt_if_missing};
use crate::cli::AdminContext;
use crate::routes::Route;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create a new administrator account")]
    Create {
        #[arg(help = "Display name")]
        name: String,
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },
}

pub async fn handle(cmd: UserCommands, ctx: &AdminContext) -> anyhow::Result<()> {
    match cmd {
        UserCommands::Create { name, email, password } => {
            ctx.enter(Route::Users)?;
            let password = prompt_if_missing(password, "Password")?;
            let user = NewUser { name, email, password };
            ctx.settle(ctx.auth.create_user(&user).await)?;
            output_success(
                &ctx.output,
                &format!("Created account for {}", user.email),
                Some(json!({ "email": user.email })),
            )
        }
    }
}
