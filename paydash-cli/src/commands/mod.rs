use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result, bail};
use paydash_client::{ApiClient, AuthProvider, SessionStore};
use paydash_shared::{config::ClientConfig, models::UserProfile};

use crate::navigator::CliNavigator;

pub mod business;
pub mod completion;
pub mod config;
pub mod menu;
pub mod session;

/// Everything a command needs, wired from the resolved configuration.
#[derive(Debug)]
pub struct App {
    pub auth: AuthProvider,
    pub storage_path: PathBuf,
}

impl App {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let session = SessionStore::file(&config.storage_path);
        let client = ApiClient::new(config, session, Arc::new(CliNavigator))
            .context("failed to build API client")?;
        Ok(Self {
            auth: AuthProvider::new(client),
            storage_path: config.storage_path.clone(),
        })
    }

    pub fn client(&self) -> &ApiClient {
        self.auth.client()
    }

    pub fn session(&self) -> &SessionStore {
        self.client().session()
    }

    /// Fails unless a usable token is stored.
    pub fn require_session(&self) -> Result<()> {
        if !self.session().has_session() {
            bail!("not logged in; run `paydash login` first");
        }
        Ok(())
    }

    /// Cached profile of the signed-in user.
    pub fn cached_user(&self) -> Result<UserProfile> {
        self.require_session()?;
        self.session()
            .get_user()
            .context("no cached profile; run `paydash me` to refresh it")
    }
}

pub fn print_profile(profile: &UserProfile) {
    println!("Logged in as {} <{}>", profile.name, profile.email);
    if !profile.roles.is_empty() {
        println!("roles: {}", profile.roles.join(", "));
    }
    if !profile.permissions.is_empty() {
        println!("permissions: {}", profile.permissions.join(", "));
    }
    match profile.business_id {
        Some(id) => println!("active business: {id}"),
        None => println!("active business: none"),
    }
}
