use chrono::Utc;
use clap::Subcommand;
use serde_json::json;

use crate::auth::Credentials;
use crate::cli::config::{load_environment_config, update_environment_config};
use crate::cli::utils::{output_success, output_value, prompt_if_missing};
use crate::cli::AdminContext;
use crate::routes::Route;
use crate::session::post_login_destination;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Sign in and store the session token")]
    Login {
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Sign out and forget the session token")]
    Logout,

    #[command(about = "Show whether a session token is stored")]
    Status,

    #[command(about = "Show the signed-in administrator")]
    Whoami,

    #[command(about = "Send a password reset code")]
    ForgotPassword {
        #[arg(help = "Email address")]
        email: String,
    },

    #[command(about = "Send a new password reset code")]
    ResendOtp {
        #[arg(help = "Email address")]
        email: String,
    },

    #[command(about = "Check a 6-digit reset code")]
    VerifyOtp {
        #[arg(help = "Email address")]
        email: String,
        #[arg(help = "6-digit code from the email")]
        otp: String,
    },

    #[command(about = "Set a new password after verify-otp")]
    ResetPassword {
        #[arg(long, help = "New password (will prompt if not provided)")]
        password: Option<String>,
        #[arg(long, help = "Repeat the new password (will prompt if not provided)")]
        confirm: Option<String>,
    },
}

pub async fn handle(cmd: AuthCommands, ctx: &AdminContext) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { email, password } => {
            let password = prompt_if_missing(password, "Password")?;
            ctx.settle(ctx.auth.login(&Credentials { email, password }).await)?;

            let mut from = None;
            update_environment_config(|env| {
                from = env.return_to.take().and_then(|path| path.parse::<Route>().ok());
                env.last_login = Some(Utc::now());
            })?;
            let next = post_login_destination(from);

            output_success(
                &ctx.output,
                &format!("Signed in. Continue with `fu-admin open {}`", next.path()),
                Some(json!({ "next": next.path() })),
            )
        }
        AuthCommands::Logout => {
            ctx.auth.logout();
            output_success(&ctx.output, "Signed out", None)
        }
        AuthCommands::Status => {
            let env = load_environment_config()?;
            let signed_in = ctx.session.is_authenticated();
            let message = if signed_in { "Signed in" } else { "Not signed in" };
            output_success(
                &ctx.output,
                message,
                Some(json!({ "authenticated": signed_in, "last_login": env.last_login })),
            )
        }
        AuthCommands::Whoami => {
            ctx.enter(Route::Dashboard)?;
            match ctx.settle(ctx.auth.whoami().await)? {
                Some(user) => output_value(&ctx.output, user.display_name(), &user),
                None => anyhow::bail!("Could not load the signed-in user"),
            }
        }
        AuthCommands::ForgotPassword { email } => {
            ctx.enter(Route::ForgotPassword)?;
            ctx.settle(ctx.auth.forgot_password(&email).await)?;
            output_success(
                &ctx.output,
                &format!("Code sent. Next: `fu-admin auth verify-otp {} <code>`", email),
                None,
            )
        }
        AuthCommands::ResendOtp { email } => {
            ctx.enter(Route::VerifyOtp)?;
            ctx.settle(ctx.auth.resend_otp(&email).await)?;
            output_success(&ctx.output, "New code sent", None)
        }
        AuthCommands::VerifyOtp { email, otp } => {
            ctx.enter(Route::VerifyOtp)?;
            let ticket = ctx.settle(ctx.auth.verify_reset_otp(&email, &otp).await)?;
            update_environment_config(|env| env.reset_ticket = Some(ticket))?;
            output_success(&ctx.output, "Code accepted. Next: `fu-admin auth reset-password`", None)
        }
        AuthCommands::ResetPassword { password, confirm } => {
            ctx.enter(Route::ResetPassword)?;
            let ticket = load_environment_config()?
                .reset_ticket
                .ok_or_else(|| anyhow::anyhow!("No verified reset code. Run `fu-admin auth verify-otp` first."))?;

            let password = prompt_if_missing(password, "New password")?;
            let confirm = prompt_if_missing(confirm, "Confirm password")?;
            ctx.settle(ctx.auth.reset_password(&ticket, &password, &confirm).await)?;

            update_environment_config(|env| env.reset_ticket = None)?;
            output_success(&ctx.output, "Password updated. Sign in with `fu-admin auth login`", None)
        }
    }
}
