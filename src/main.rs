#[macro_use]
extern crate rocket;

use std::process;
use std::sync::Arc;

use seo_meta_tags::config::AppConfig;
use seo_meta_tags::hooks::Hooks;
use seo_meta_tags::store::sqlite::SqliteStore;
use seo_meta_tags::store::Store;
use seo_meta_tags::{boot, build_rocket};

#[launch]
fn rocket() -> _ {
    env_logger::init();

    let rocket = rocket::build();
    let config = AppConfig::from_figment(rocket.figment());

    // Boot check — verify/create directories
    if boot::run(&config) > 0 {
        process::exit(1);
    }

    let store = SqliteStore::new_at(&config.db_path).expect("Failed to initialize database pool");
    store.run_migrations().expect("Failed to run database migrations");
    store.seed_defaults().expect("Failed to seed default options");

    log::info!("Serving {} (admin under {})", config.db_path, seo_meta_tags::ADMIN_MOUNT);

    let store: Arc<dyn Store> = Arc::new(store);
    build_rocket(rocket, store, Hooks::new(), config)
}
