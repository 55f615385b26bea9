use actix_files as fs;
use actix_web::dev::Server;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;

use crate::auth::SessionController;
use crate::clock::Clock;
use crate::configuration::{JwtSettings, PolkaSettings};
use crate::error::{path_error_handler, query_error_handler};
use crate::middleware::{FileserverHits, HitCounter};
use crate::routes::{
    create_chirp, create_user, delete_chirp, get_chirp, get_user, health_check, list_chirps,
    list_users, login, metrics, polka_webhook, refresh, reset_metrics, revoke, update_user,
    validate_chirp,
};
use crate::store::Db;

pub fn run(
    listener: TcpListener,
    db: Arc<Db>,
    jwt_config: JwtSettings,
    polka_config: PolkaSettings,
    clock: Arc<dyn Clock>,
) -> Result<Server, std::io::Error> {
    let sessions = web::Data::new(SessionController::new(db.clone(), &jwt_config, clock));
    let db = web::Data::from(db);
    let polka = web::Data::new(polka_config);
    let hits = web::Data::new(FileserverHits::default());

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())

            // Shared state
            .app_data(db.clone())
            .app_data(sessions.clone())
            .app_data(polka.clone())
            .app_data(hits.clone())
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))

            .service(
                web::scope("/api")
                    .route("/healthz", web::get().to(health_check))
                    .route("/reset", web::post().to(reset_metrics))
                    .route("/validate_chirp", web::post().to(validate_chirp))
                    .route("/login", web::post().to(login))
                    .route("/refresh", web::post().to(refresh))
                    .route("/revoke", web::post().to(revoke))
                    .service(
                        web::resource("/users")
                            .route(web::post().to(create_user))
                            .route(web::get().to(list_users))
                            .route(web::put().to(update_user)),
                    )
                    .route("/users/{id}", web::get().to(get_user))
                    .service(
                        web::resource("/chirps")
                            .route(web::post().to(create_chirp))
                            .route(web::get().to(list_chirps)),
                    )
                    .service(
                        web::resource("/chirps/{id}")
                            .route(web::get().to(get_chirp))
                            .route(web::delete().to(delete_chirp)),
                    )
                    .route("/polka/webhooks", web::post().to(polka_webhook)),
            )
            .route("/admin/metrics", web::get().to(metrics))

            // Static files, counted
            .service(
                web::scope("/app")
                    .wrap(HitCounter::new(hits.clone()))
                    .service(fs::Files::new("/", "./public").index_file("index.html")),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
