use std::{
    fmt::Write as _,
    io::{self, Write},
};

use anyhow::{Result, bail};
use clap::Args;
use paydash_client::{ApiError, AuthState};
use paydash_shared::models::{LoginRequest, RegisterRequest};
use rpassword::prompt_password;

use super::{App, print_profile};

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email; prompted for when omitted
    #[arg(long, short)]
    pub email: Option<String>,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Display name of the account owner
    #[arg(long, short)]
    pub name: String,

    /// Account email
    #[arg(long, short)]
    pub email: String,

    /// Trading name of the first business
    #[arg(long, short)]
    pub business_name: Option<String>,
}

pub async fn login(app: &App, args: LoginArgs) -> Result<()> {
    let email = match args.email {
        Some(email) => email,
        None => prompt("Email: ")?,
    };
    let password = prompt_password("Password: ")?;
    if password.trim().is_empty() {
        bail!("password must not be empty");
    }

    let profile = app
        .auth
        .login(&LoginRequest { email, password })
        .await
        .map_err(describe)?;
    print_profile(&profile);
    println!("session stored at {}", app.storage_path.display());
    Ok(())
}

pub async fn register(app: &App, args: RegisterArgs) -> Result<()> {
    let password = prompt_password("Password: ")?;
    let confirmation = prompt_password("Confirm password: ")?;
    if password.trim().is_empty() {
        bail!("password must not be empty");
    }
    if password != confirmation {
        bail!("passwords do not match");
    }

    let profile = app
        .auth
        .register(&RegisterRequest {
            name: args.name,
            email: args.email,
            password,
            business_name: args.business_name,
        })
        .await
        .map_err(describe)?;
    print_profile(&profile);
    println!("session stored at {}", app.storage_path.display());
    Ok(())
}

pub async fn logout(app: &App) -> Result<()> {
    if !app.session().has_session() {
        app.session().clear_all();
        println!("No active session at {}", app.storage_path.display());
        return Ok(());
    }
    app.auth.logout().await;
    println!("Signed out; removed session at {}", app.storage_path.display());
    Ok(())
}

pub async fn me(app: &App) -> Result<()> {
    app.require_session()?;
    match app.auth.initialize().await {
        AuthState::Authenticated(profile) => {
            print_profile(&profile);
            Ok(())
        }
        AuthState::Error(message) => bail!("failed to load profile: {message}"),
        AuthState::Anonymous | AuthState::Initializing => {
            bail!("session expired. run `paydash login` to sign in again")
        }
    }
}

/// Turns an API error into a message listing field-level validation errors.
pub fn describe(err: ApiError) -> anyhow::Error {
    let mut message = err.to_string();
    if let Some(errors) = err.validation_errors() {
        for (field, problems) in errors {
            for problem in problems {
                let _ = write!(message, "\n  {field}: {problem}");
            }
        }
    }
    anyhow::Error::msg(message)
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush().ok();
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let trimmed = input.trim().to_string();
    if trimmed.is_empty() {
        bail!("input must not be empty");
    }
    Ok(trimmed)
}
