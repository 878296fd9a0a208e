use hubspot_http::RequestBuilder;
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut contacts = RequestBuilder::from_env()?;
    let page = contacts
        .set_endpoint("crm/v3/objects/contacts")
        .set_page_size(10)
        .set_properties("email,firstname,lastname")
        .set_associations("companies")
        .execute()
        .await?;
    println!("{} ({} bytes)", contacts.status(), page.len());

    let mut create = RequestBuilder::from_env()?;
    let created = create
        .set_method("POST")
        .set_endpoint("crm/v3/objects/contacts")
        .set_json_body(&json!({
            "properties": { "email": "kit@example.com", "firstname": "Kit" }
        }))?
        .execute()
        .await?;
    println!("{}: {}", create.status_code(), String::from_utf8_lossy(&created));

    Ok(())
}
