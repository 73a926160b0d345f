use actix_files as fs;
use actix_web::dev::Server;
use actix_web::{guard, middleware::Logger, web, App, HttpServer};
use std::net::TcpListener;

use crate::configuration::Settings;
use crate::logger::LoggerMiddleware;
use crate::middleware::JwtMiddleware;
use crate::routes::{
    create_chirp, create_user, delete_chirp, get_chirp, get_user, health_check, list_chirps,
    list_users, login, polka_webhook, refresh, revoke, update_user,
};
use crate::store::Database;

pub fn run(
    listener: TcpListener,
    database: Database,
    settings: Settings,
) -> Result<Server, std::io::Error> {
    let database = web::Data::new(database);
    let jwt_config = settings.jwt.clone();
    let jwt_config_data = web::Data::new(settings.jwt);
    let polka_data = web::Data::new(settings.polka);
    let static_dir = settings.application.static_dir;

    let server = HttpServer::new(move || {
        App::new()
            // Global middleware
            .wrap(Logger::default())
            .wrap(LoggerMiddleware)

            // Shared state
            .app_data(database.clone())
            .app_data(jwt_config_data.clone())
            .app_data(polka_data.clone())

            .route("/api/healthz", web::get().to(health_check))

            // Session-protected routes; the guard lets other methods fall through
            .service(
                web::resource("/api/users")
                    .guard(guard::Put())
                    .route(web::put().to(update_user))
                    .wrap(JwtMiddleware::new(jwt_config.clone())),
            )
            .service(
                web::resource("/api/chirps")
                    .guard(guard::Post())
                    .route(web::post().to(create_chirp))
                    .wrap(JwtMiddleware::new(jwt_config.clone())),
            )
            .service(
                web::resource("/api/chirps/{chirp_id}")
                    .guard(guard::Delete())
                    .route(web::delete().to(delete_chirp))
                    .wrap(JwtMiddleware::new(jwt_config.clone())),
            )

            // Public routes
            .route("/api/users", web::post().to(create_user))
            .route("/api/users", web::get().to(list_users))
            .route("/api/users/{user_id}", web::get().to(get_user))
            .route("/api/login", web::post().to(login))
            .route("/api/refresh", web::post().to(refresh))
            .route("/api/revoke", web::post().to(revoke))
            .route("/api/chirps", web::get().to(list_chirps))
            .route("/api/chirps/{chirp_id}", web::get().to(get_chirp))
            .route("/api/polka/webhooks", web::post().to(polka_webhook))

            // Static file serving
            .service(fs::Files::new("/app", static_dir.clone()).index_file("index.html"))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
