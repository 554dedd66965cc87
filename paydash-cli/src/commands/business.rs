use anyhow::Result;
use paydash_client::BusinessService;

use super::{App, session::describe};

pub async fn list(app: &App) -> Result<()> {
    app.require_session()?;
    let service = BusinessService::new(app.client().clone());
    let businesses = service.list().await.map_err(describe)?;
    if businesses.is_empty() {
        println!("No businesses found.");
        return Ok(());
    }

    let active = service.active_business_id();
    for business in businesses {
        let marker = if Some(business.id) == active { '*' } else { ' ' };
        match &business.status {
            Some(status) => println!("{marker} {:>6}  {} ({status})", business.id, business.name),
            None => println!("{marker} {:>6}  {}", business.id, business.name),
        }
    }
    Ok(())
}

pub async fn switch(app: &App, business_id: i64) -> Result<()> {
    app.require_session()?;
    match app
        .auth
        .switch_business(business_id)
        .await
        .map_err(describe)?
    {
        Some(profile) => println!(
            "Active business is now {}",
            profile.business_id.unwrap_or(business_id)
        ),
        None => println!("Active business is now {business_id}"),
    }
    Ok(())
}
