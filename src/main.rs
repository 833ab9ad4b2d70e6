#[macro_use]
extern crate rocket;

use rocket::fs::FileServer;
use rocket::response::content::RawHtml;

use std::sync::Arc;

mod ai;
mod boot;
mod compose;
mod db;
mod models;
mod routes;
mod seo;
mod store;


use ai::{ContentGenerator, ImageSearch};
use store::sqlite::SqliteStore;
use store::Store;

#[catch(404)]
fn not_found() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>404</h1><p>Page not found.</p><a href='/'>← Home</a></body></html>".to_string())
}

#[catch(500)]
fn server_error() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>500</h1><p>Internal server error.</p><a href='/'>← Home</a></body></html>".to_string())
}

#[launch]
fn rocket() -> _ {
    env_logger::init();

    // Boot check: verify/create directories, warn on missing assets
    boot::run();

    let pool = db::init_pool().expect("Failed to initialize database pool");
    let store = SqliteStore::new(pool);
    store.run_migrations().expect("Failed to run database migrations");
    store.seed_defaults().expect("Failed to seed default settings");

    let store: Arc<dyn Store> = Arc::new(store);
    let generator: Arc<dyn ContentGenerator> = Arc::new(ai::NoGenerator);
    let image_search: Arc<dyn ImageSearch> = Arc::new(ai::NoImageSearch);

    log::info!(
        "Serving {} published landing page(s)",
        store.page_count(Some(models::page::PageStatus::Published))
    );

    rocket::build()
        .manage(store)
        .manage(generator)
        .manage(image_search)
        .mount("/static", FileServer::from("website/static"))
        .mount("/", routes::public::routes())
        .mount("/admin", routes::admin::routes())
        .mount("/api", routes::api::routes())
        .register("/", catchers![not_found, server_error])
}
