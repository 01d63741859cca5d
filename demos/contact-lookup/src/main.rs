//! Contact lookup: logs in, lists contacts by last name, logs out.
//!
//! ```text
//! SUGARBRIDGE_URL=https://crm.example.com \
//! SUGARBRIDGE_USER=admin SUGARBRIDGE_PASSWORD=secret \
//!     cargo run -p contact-lookup -- Smith
//! ```
//!
//! `SUGARBRIDGE_TIMEOUT` (seconds) is optional.

use std::env;

use sugarbridge::prelude::*;

fn required(name: &str) -> Result<String, Box<dyn std::error::Error>> {
    env::var(name).map_err(|_| format!("{name} is not set").into())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    sugarbridge::logging::init("info");

    let base_uri = required("SUGARBRIDGE_URL")?;
    let credentials = Credentials::new(
        required("SUGARBRIDGE_USER")?,
        required("SUGARBRIDGE_PASSWORD")?,
    );
    let last_name = env::args().nth(1).unwrap_or_else(|| "Smith".to_string());

    let mut builder =
        CrmClientBuilder::new(base_uri).application_name("contact-lookup");
    if let Ok(timeout) = env::var("SUGARBRIDGE_TIMEOUT") {
        builder = builder.timeout_secs(timeout.parse()?);
    }
    let mut client = builder.build()?;

    if !client.login(&credentials).await? {
        return Err("username and password must both be non-empty".into());
    }

    let query = format!(
        "contacts.last_name = '{}'",
        last_name.replace('\'', "''")
    );
    let options = EntryListOptions::default()
        .query(query)
        .order_by("contacts.first_name")
        .max_results(20)
        .select(&["id", "first_name", "last_name", "email1"])
        .relate("accounts", &["id", "name"]);

    let page = client.get_entry_list("Contacts", &options).await?;
    tracing::info!(
        shown = page.entries.len(),
        total = page.total_count,
        "contacts found"
    );
    for contact in &page.entries {
        println!("{}", serde_json::to_string(contact)?);
    }

    client.logout().await?;
    Ok(())
}
