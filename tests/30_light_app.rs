mod common;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn create(client: &reqwest::Client, server: &common::TestServer, name: &str) -> Result<String> {
    let body: Value = client
        .post(server.url("/paas/api/v2/light_app/create_app/"))
        .json(&json!({
            "bk_app_code": "test2",
            "bk_light_app_name": name,
            "app_url": "https://light.example.com/",
        }))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(body["result"], true, "create failed: {}", body);
    assert_eq!(body["message"], "创建轻应用成功");
    body["data"]["bk_light_app_code"]
        .as_str()
        .map(str::to_string)
        .context("missing bk_light_app_code")
}

#[tokio::test]
async fn light_app_lifecycle() -> Result<()> {
    let server = common::start_server().await?;
    let client = common::gateway_client()?;

    let code = create(&client, &server, "Lifecycle").await?;

    let res = client
        .put(server.url("/paas/api/v2/light_app/edit_app/"))
        .json(&json!({"bk_light_app_code": code, "introduction": "edited"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "app 修改成功");

    let res = client
        .put(server.url("/paas/api/v2/light_app/modify_app_logo/"))
        .json(&json!({"bk_light_app_code": code, "logo": "R0lGODlhAQABAAAAACw="}))
        .send()
        .await?;
    let body: Value = res.json().await?;
    assert_eq!(body["result"], true, "logo change failed: {}", body);

    for _ in 0..2 {
        let res = client
            .delete(server.url("/paas/api/v2/light_app/del_app/"))
            .json(&json!({"bk_light_app_code": code}))
            .send()
            .await?;
        let body: Value = res.json().await?;
        assert_eq!(body["result"], true);
        assert_eq!(body["message"], "app 下架成功");
    }

    // inactive light apps can no longer be edited
    let res = client
        .put(server.url("/paas/api/v2/light_app/edit_app/"))
        .json(&json!({"bk_light_app_code": code, "bk_light_app_name": "Back"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn invalid_payloads_fail_validation() -> Result<()> {
    let server = common::start_server().await?;
    let client = common::gateway_client()?;

    let res = client
        .post(server.url("/paas/api/v2/light_app/create_app/"))
        .body("definitely not json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(
        body,
        json!({
            "result": false,
            "code": 1302100,
            "message": "bk_app_code: This field is required.",
            "data": null
        })
    );

    let code = create(&client, &server, "BadLogo").await?;
    let res = client
        .put(server.url("/paas/api/v2/light_app/modify_app_logo/"))
        .json(&json!({"bk_light_app_code": code, "logo": "data:image/png;base64,AAAA"}))
        .send()
        .await?;
    let body: Value = res.json().await?;
    assert_eq!(body["result"], false);
    assert_eq!(body["message"], "logo 数据格式不合法");
    Ok(())
}

#[tokio::test]
async fn wrong_verb_is_rejected() -> Result<()> {
    let server = common::start_server().await?;
    let client = common::gateway_client()?;

    let res = client
        .get(server.url("/paas/api/v2/light_app/create_app/"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    Ok(())
}
