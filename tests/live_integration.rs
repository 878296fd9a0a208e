use hubspot_http::{HubSpotError, RequestBuilder};
use serde_json::Value as JsonValue;

#[tokio::test]
async fn live_contacts_page_and_missing_object() {
    let mut request = match RequestBuilder::from_env() {
        Ok(request) => request,
        Err(HubSpotError::Config(reason)) => {
            eprintln!("skipping live test: {reason}");
            return;
        }
        Err(other) => panic!("unexpected error building request: {other}"),
    };

    let body = request
        .set_endpoint("crm/v3/objects/contacts")
        .set_page_size(1)
        .set_properties("email")
        .execute()
        .await
        .expect("contacts page must be fetched");
    assert_eq!(request.status_code(), 200);
    let page: JsonValue = serde_json::from_slice(&body).expect("page must be json");
    assert!(page["results"].is_array());

    let mut missing = RequestBuilder::from_env().expect("env was readable above");
    missing
        .set_endpoint("crm/v3/objects/contacts/0")
        .execute()
        .await
        .expect("404 must be returned as a response");
    assert_eq!(missing.status_code(), 404);
}
