use clap::Subcommand;
use serde_json::json;
use wellspring_core::auth::{PasswordResetForm, SignInForm, SignUpForm, SignUpOutcome};
use wellspring_core::{App, Config};

use crate::console::{build_app, print_event, runtime, CliResult};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Sign in with email and password
    Signin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Password confirmation (must match --password)
        #[arg(long)]
        confirm: String,
    },
    /// Send a password reset link
    Reset {
        #[arg(long)]
        email: String,
    },
    /// Sign out and forget the stored session
    Signout,
    /// Print the current session as JSON
    Status,
}

pub fn run(action: AuthAction) -> CliResult {
    let config = Config::load()?;
    if config.auth.is_local() && !matches!(action, AuthAction::Status) {
        return Err("no auth backend configured: local accounts only last for one \
             `wellspring shell` session (set auth.url to use a hosted backend)"
            .into());
    }
    let app = build_app(&config)?;
    runtime()?.block_on(execute(app, action))
}

async fn execute(mut app: App, action: AuthAction) -> CliResult {
    app.restore().await?;
    match action {
        AuthAction::Signin { email, password } => {
            let event = app.sign_in(&SignInForm::new(email, password)).await?;
            print_event(&event)?;
        }
        AuthAction::Signup {
            name,
            email,
            password,
            confirm,
        } => {
            let form = SignUpForm {
                full_name: name,
                email,
                password,
                confirm_password: confirm,
            };
            let status = match app.sign_up(&form).await? {
                SignUpOutcome::ConfirmationRequired => "confirmation_required",
                SignUpOutcome::SignedIn(_) => "signed_in",
            };
            println!("{}", json!({ "status": status }));
        }
        AuthAction::Reset { email } => {
            app.request_password_reset(&PasswordResetForm::new(email))
                .await?;
            println!("{}", json!({ "status": "reset_link_sent" }));
        }
        AuthAction::Signout => {
            let event = app.sign_out().await?;
            print_event(&event)?;
        }
        AuthAction::Status => {
            let user = app.user();
            let status = json!({
                "provider": app.provider_name(),
                "signed_in": user.is_some(),
                "email": user.as_ref().map(|u| u.email.clone()),
                "name": user.as_ref().map(|u| u.display_name().to_string()),
            });
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }
    Ok(())
}
