mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::send;
use ide_console::build_api_server_from_env;
use serial_test::serial;

fn clear_env() {
    for var in ["SEED_SAMPLE_DATA", "PAGE_SIZE", "RUNNER_PROVISION_DELAY_MS"] {
        unsafe { std::env::remove_var(var) };
    }
}

#[tokio::test]
#[serial]
async fn empty_server_from_env() -> Result<()> {
    clear_env();
    let app = build_api_server_from_env().await?.into_router();
    let (status, page) = send(&app, "GET", "/api/v1/connectors", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total_items"], 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
#[serial]
async fn seeded_server_from_env() -> Result<()> {
    clear_env();
    unsafe {
        std::env::set_var("SEED_SAMPLE_DATA", "true");
        std::env::set_var("PAGE_SIZE", "10");
        std::env::set_var("RUNNER_PROVISION_DELAY_MS", "1000");
    }
    let app = build_api_server_from_env().await?.into_router();
    clear_env();

    let (_, connectors) =
        send(&app, "GET", "/api/v1/connectors", None).await?;
    assert_eq!(connectors["total_items"], 4);
    assert_eq!(connectors["per_page"], 10);

    let (_, inactive) =
        send(&app, "GET", "/api/v1/connectors?active=false", None).await?;
    assert_eq!(inactive["items"][0]["name"], "DigitalOcean");

    let (_, images) = send(&app, "GET", "/api/v1/images", None).await?;
    assert_eq!(images["total_items"], 6);

    let (_, starting) =
        send(&app, "GET", "/api/v1/runners?state=starting", None).await?;
    assert_eq!(starting["total_items"], 1);

    tokio::time::sleep(std::time::Duration::from_millis(1001)).await;
    let (_, starting) =
        send(&app, "GET", "/api/v1/runners?state=starting", None).await?;
    assert_eq!(starting["total_items"], 0);
    let (_, ready) =
        send(&app, "GET", "/api/v1/runners?state=ready", None).await?;
    assert_eq!(ready["total_items"], 2);
    Ok(())
}
