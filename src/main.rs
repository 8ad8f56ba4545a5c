use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local;
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use queue_backend::{
    config::Config,
    database::{create_connection, run_migrations},
    external::OAuthClient,
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().expect("Failed to load configuration");

    let db = create_connection(&config.database)
        .await
        .expect("Failed to connect to the database");

    run_migrations(&db)
        .await
        .expect("Failed to run database migrations");

    let jwt_service = JwtService::new(
        &config.jwt.secret,
        &config.jwt.algorithm,
        config.jwt.access_token_expire_minutes,
    )
    .expect("Invalid JWT configuration");

    let oauth_client = OAuthClient::new();

    let auth_service = AuthService::new(db.clone(), jwt_service.clone(), oauth_client);
    let point_service = PointService::new(db.clone());
    let cashier_service = CashierService::new(db.clone());
    let order_service = OrderService::new(db.clone(), config.pagination.clone());

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    let allowed_origins = config.cors.allowed_origins.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors(&allowed_origins))
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(point_service.clone()))
            .app_data(web::Data::new(cashier_service.clone()))
            .app_data(web::Data::new(order_service.clone()))
            .configure(swagger_config)
            .route("/", web::get().to(handlers::index))
            .configure(handlers::health_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::health_config)
                    .configure(handlers::auth_config)
                    .configure(handlers::point_config)
                    .configure(handlers::cashier_config)
                    .configure(handlers::order_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
