use actix_web::{web, HttpResponse};

use crate::middleware::FileserverHits;

/// GET /admin/metrics
pub async fn metrics(hits: web::Data<FileserverHits>) -> HttpResponse {
    let body = format!(
        r#"<html>
  <body>
    <h1>Welcome, Chirpy Admin</h1>
    <p>Chirpy has been visited {} times!</p>
  </body>
</html>"#,
        hits.get()
    );

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// POST /api/reset
pub async fn reset_metrics(hits: web::Data<FileserverHits>) -> HttpResponse {
    hits.reset();
    tracing::info!("Fileserver hit counter reset");
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Hits reset to 0")
}
