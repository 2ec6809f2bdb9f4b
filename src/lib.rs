#[macro_use]
extern crate rocket;

use std::sync::Arc;

use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::Header;
use rocket::response::content::RawHtml;
use rocket::{Build, Rocket};

pub mod boot;
pub mod cache;
pub mod config;
pub mod db;
pub mod hooks;
pub mod models;
pub mod render;
pub mod routes;
pub mod security;
pub mod seo;
pub mod store;


use cache::ObjectCache;
use config::AppConfig;
use hooks::Hooks;
use security::nonce::Nonces;
use store::Store;

pub const ADMIN_MOUNT: &str = "/admin";

pub struct NoCacheAdmin;

#[rocket::async_trait]
impl Fairing for NoCacheAdmin {
    fn info(&self) -> Info {
        Info { name: "No-Cache Admin Responses", kind: Kind::Response }
    }

    async fn on_response<'r>(&self, req: &'r rocket::Request<'_>, res: &mut rocket::Response<'r>) {
        if req.uri().path().starts_with(ADMIN_MOUNT) {
            res.set_header(Header::new("Cache-Control", "no-store, no-cache, must-revalidate, max-age=0"));
            res.set_header(Header::new("Pragma", "no-cache"));
        }
    }
}

#[catch(404)]
fn not_found() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>404</h1><p>Page not found.</p><a href='/'>← Home</a></body></html>".to_string())
}

#[catch(500)]
fn server_error() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>500</h1><p>Internal server error.</p><a href='/'>← Home</a></body></html>".to_string())
}

/// Assemble the application around an already migrated store.
pub fn build_rocket(rocket: Rocket<Build>, store: Arc<dyn Store>, hooks: Hooks, config: AppConfig) -> Rocket<Build> {
    let nonces = Nonces::new(&config.nonce_secret_or_generate());

    rocket
        .manage(store)
        .manage(hooks)
        .manage(ObjectCache::<Vec<String>>::new())
        .manage(nonces)
        .manage(config)
        .attach(NoCacheAdmin)
        .mount("/", routes::public::routes())
        .mount(ADMIN_MOUNT, routes::admin::routes())
        .register("/", catchers![not_found, server_error])
}
