use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use log::info;

use hr_manager_backend::{config::Settings, configure_routes, db};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let settings = Settings::from_env();

    // Initialize the database pool
    let pool = db::create_pool(&settings.database_url, settings.max_connections)
        .await
        .map_err(std::io::Error::other)?;
    db::ensure_schema(&pool)
        .await
        .map_err(std::io::Error::other)?;

    info!("Starting server at {}", settings.bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .configure(configure_routes)
    })
    .bind(&settings.bind_address)?
    .run()
    .await
}
