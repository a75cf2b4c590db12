use std::error::Error;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use fittrack_api::{
    accounts::{AccountService, RandomUsernames},
    config::Settings,
    routes,
};
use fittrack_db::{connection::Connection, user::UserRepositoryImpl};
use log::info;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn Error>> {
    log4rs::init_file("log4rs.yml", Default::default())?;
    let settings = Settings::from_env()?;

    info!("Connecting to database");
    let conn = Connection::connect(&settings.database_url).await?;
    let accounts = web::Data::new(AccountService::new(
        Box::new(UserRepositoryImpl::new(conn)),
        Box::new(RandomUsernames),
    ));

    info!("Listening on {}:{}", settings.host, settings.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .app_data(accounts.clone())
            .configure(routes::configure)
    })
    .bind((settings.host.as_str(), settings.port))?
    .run()
    .await?;

    Ok(())
}
