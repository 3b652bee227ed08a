use std::io;
use std::sync::Arc;

use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use log::{error, info};

use employee_records::config::{AppConfig, StoreBackend};
use employee_records::db;
use employee_records::handlers;
use employee_records::services::employee::EmployeeService;
use employee_records::store::{EmployeeStore, MemoryEmployeeStore, PgEmployeeStore};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env().map_err(|err| {
        error!("Invalid configuration: {}", err);
        io::Error::new(io::ErrorKind::InvalidInput, err)
    })?;

    let store: Arc<dyn EmployeeStore> = match config.backend {
        StoreBackend::Postgres => {
            let url = config.database_url.as_deref().unwrap_or_default();
            let pool = db::create_pool(url, config.max_connections)
                .await
                .map_err(|err| {
                    error!("Failed to connect to the database: {}", err);
                    io::Error::new(io::ErrorKind::ConnectionRefused, err)
                })?;
            Arc::new(PgEmployeeStore::new(pool))
        }
        StoreBackend::Memory => {
            info!("Using in-memory employee store");
            Arc::new(MemoryEmployeeStore::new())
        }
    };
    let service = web::Data::new(EmployeeService::new(store));

    let (host, port) = config.bind_address();
    info!("Starting server at {}:{}", host, port);

    let allowed_origin = config.cors_allowed_origin.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(handlers::cors(&allowed_origin))
            .wrap(middleware::Logger::default())
            .app_data(service.clone())
            .configure(handlers::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
