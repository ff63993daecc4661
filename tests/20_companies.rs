mod common;

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

async fn create_company(client: &Client, server: &common::TestServer, handle: &str, employees: i64) -> Result<Value> {
    let res = client
        .post(server.url("/companies"))
        .bearer_auth(common::admin_token())
        .json(&json!({
            "handle": handle,
            "name": format!("Name {}", handle),
            "description": "Desc",
            "numEmployees": employees,
            "logoUrl": "http://c.img"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    Ok(res.json().await?)
}

#[tokio::test]
async fn create_get_update_delete() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = Client::new();
    let handle = server.unique("c");

    let body = create_company(&client, server, &handle, 10).await?;
    assert_eq!(body["company"]["handle"], handle.as_str());
    assert_eq!(body["company"]["numEmployees"], 10);

    let res = client.get(server.url(&format!("/companies/{}", handle))).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["company"]["jobs"], json!([]));

    let res = client
        .patch(server.url(&format!("/companies/{}", handle)))
        .bearer_auth(common::admin_token())
        .json(&json!({ "numEmployees": 20, "logoUrl": "http://new.img" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["company"]["numEmployees"], 20);
    assert_eq!(body["company"]["logoUrl"], "http://new.img");

    let res = client
        .delete(server.url(&format!("/companies/{}", handle)))
        .bearer_auth(common::admin_token())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body, json!({ "deleted": handle }));

    let res = client.get(server.url(&format!("/companies/{}", handle))).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn duplicate_handle_is_400() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = Client::new();
    let handle = server.unique("d");
    create_company(&client, server, &handle, 1).await?;

    let res = client
        .post(server.url("/companies"))
        .bearer_auth(common::admin_token())
        .json(&json!({ "handle": handle, "name": "Other", "description": "Desc" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["error"]["message"], format!("Duplicate company: {}", handle));
    Ok(())
}

#[tokio::test]
async fn filters_by_size_and_name() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = Client::new();
    let small = server.unique("f");
    let large = server.unique("f");
    create_company(&client, server, &small, 2).await?;
    create_company(&client, server, &large, 300).await?;

    // Names are "Name <handle>", so the handle narrows the listing to this test
    let res = client
        .get(server.url(&format!("/companies?nameLike={}&minEmployees=100", large)))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    let handles: Vec<&str> = body["companies"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|c| c["handle"].as_str())
        .collect();
    assert_eq!(handles, vec![large.as_str()]);

    let res = client
        .get(server.url(&format!("/companies?maxEmployees=5&nameLike={}", small)))
        .send()
        .await?;
    let body: Value = res.json().await?;
    assert_eq!(body["companies"].as_array().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn bad_filters_are_400() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };

    let res = reqwest::get(server.url("/companies?minEmployees=10&maxEmployees=2")).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = reqwest::get(server.url("/companies?colour=red")).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn writes_need_admin() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = Client::new();

    let res = client
        .patch(server.url("/companies/anything"))
        .bearer_auth(common::user_token("u1"))
        .json(&json!({ "name": "nope" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
