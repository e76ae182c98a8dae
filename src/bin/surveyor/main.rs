use actix_web::http::header;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use env_logger::Env;
use surveyor::app_config;
use surveyor::db::{connect, create_schema};
use surveyor::web::{configure, cors, route_not_found, Services};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_lib_mods();
    app_config::init();

    let config = app_config::get_config();
    let db = connect(&config.database)
        .await
        .context("Failed to connect to the database")?;
    create_schema(&db)
        .await
        .context("Failed to create the database schema")?;

    let services = Services::new(db, &config.auth);
    let bind_address = config.server.bind_address();
    log::info!("Listening on {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        let services = services.clone();

        // Middleware is listed in reverse execution order.
        App::new()
            .configure(|conf| services.register(conf))
            .wrap(
                DefaultHeaders::new()
                    .add((header::X_FRAME_OPTIONS, "DENY"))
                    .add((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
                    .add(("Referrer-Policy", "strict-origin-when-cross-origin")),
            )
            .wrap(cors())
            .wrap(Logger::new("%a \"%r\" %s %Dms"))
            .configure(configure)
            .default_service(web::route().to(route_not_found))
    })
    .bind(bind_address)?
    .run()
    .await?;

    Ok(())
}

/// Initialize third party crates we rely on but don't have control over.
fn init_lib_mods() {
    // A missing .env file is fine, the environment may already be set.
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
}
