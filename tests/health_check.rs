mod common;

use common::spawn_app;

#[tokio::test]
async fn health_check_works() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(app.url("/api/healthz"))
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());
    assert_eq!(
        response.headers()["content-type"],
        "text/plain; charset=utf-8"
    );
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn fileserver_hits_are_counted_and_reset() {
    let app = spawn_app().await;

    for _ in 0..3 {
        app.client
            .get(app.url("/app/"))
            .send()
            .await
            .expect("Failed to execute request.");
    }

    let metrics = app
        .client
        .get(app.url("/admin/metrics"))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, metrics.status().as_u16());
    assert!(metrics
        .text()
        .await
        .unwrap()
        .contains("Chirpy has been visited 3 times!"));

    let reset = app
        .client
        .post(app.url("/api/reset"))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, reset.status().as_u16());

    let metrics = app
        .client
        .get(app.url("/admin/metrics"))
        .send()
        .await
        .expect("Failed to execute request.");
    assert!(metrics
        .text()
        .await
        .unwrap()
        .contains("Chirpy has been visited 0 times!"));
}

#[tokio::test]
async fn api_routes_are_not_counted() {
    let app = spawn_app().await;

    app.client
        .get(app.url("/api/healthz"))
        .send()
        .await
        .expect("Failed to execute request.");

    let body = app
        .client
        .get(app.url("/admin/metrics"))
        .send()
        .await
        .expect("Failed to execute request.")
        .text()
        .await
        .unwrap();
    assert!(body.contains("Chirpy has been visited 0 times!"));
}
