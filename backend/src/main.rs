mod config;
mod error;
mod naming;
mod scorer;
mod services;
mod state;
mod store;

use crate::state::AppState;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use env_logger::Env;
use log::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let cfg = config::load()?;
    let scorer = scorer::select(&cfg.scorer).await?;
    info!("Scoring outfits with the {} scorer", scorer.name());

    let state = AppState::new(&cfg.storage, scorer).with_context(|| {
        format!(
            "creating upload directory {}",
            cfg.storage.upload_dir.display()
        )
    })?;
    info!(
        "Storing images in {} and records in {}",
        state.uploads.path().display(),
        state.store.path().display()
    );

    let host = cfg.server.host.clone();
    let port = cfg.server.port;
    info!("Server running at http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(services::json_config())
            // The outfit scope is mounted at "/", so the file service goes first.
            .service(services::uploaded_files(state.uploads.path()))
            .service(services::outfits::configure_routes())
    })
    .bind((host.as_str(), port))?
    .run()
    .await?;

    Ok(())
}
