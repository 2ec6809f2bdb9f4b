use std::sync::Arc;

use rocket::form::Form;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use serde_json::{json, Value};

use crate::hooks::Hooks;
use crate::models::settings::FIELD_DESCRIPTORS;
use crate::security::auth::{EditCapability, EditorUser};
use crate::security::nonce::Nonces;
use crate::seo::save::{self, ItemSeoPanel, SaveRequest, SettingsForm};
use crate::store::Store;

use super::{engine, CategoryCache};

/// Items of this kind are stored revisions; their fields are never saved.
const KIND_REVISION: &str = "revision";

// ── Settings ───────────────────────────────────────────

#[get("/settings")]
pub fn settings_get(
    _editor: EditorUser,
    store: &State<Arc<dyn Store>>,
    hooks: &State<Hooks>,
    cache: &State<CategoryCache>,
) -> Json<Value> {
    let meta = engine(store, hooks, cache);
    Json(json!({
        "settings": meta.settings(),
        "fields": &FIELD_DESCRIPTORS[..],
        "supported_kinds": meta.supported_kinds(),
        "registered_kinds": meta.registered_kinds(),
    }))
}

#[post("/settings", data = "<form>")]
pub fn settings_save(
    _editor: EditorUser,
    store: &State<Arc<dyn Store>>,
    form: Json<SettingsForm>,
) -> Json<Value> {
    let s: &dyn Store = &**store.inner();
    match save::save_settings(s, &form.into_inner()) {
        Ok(settings) => Json(json!({ "ok": true, "settings": settings })),
        Err(e) => {
            log::error!("Failed to save SEO settings: {}", e);
            Json(json!({ "ok": false, "error": e }))
        }
    }
}

// ── Per-item fields ────────────────────────────────────

#[get("/items/<id>/seo")]
pub fn item_seo_panel(
    _editor: EditorUser,
    id: i64,
    store: &State<Arc<dyn Store>>,
    hooks: &State<Hooks>,
    cache: &State<CategoryCache>,
    nonces: &State<Nonces>,
) -> Option<Json<Value>> {
    let item = store.item_find_by_id(id)?;
    let meta = engine(store, hooks, cache);
    match ItemSeoPanel::load(&meta, nonces, &item) {
        Some(panel) => Some(Json(json!(panel))),
        None => Some(Json(json!({
            "item_id": id,
            "kind": item.kind,
            "supported": false,
        }))),
    }
}

/// The edit form as posted. Unknown fields are ignored.
#[derive(Debug, FromForm)]
pub struct ItemSeoForm {
    pub mt_seo_nonce: Option<String>,
    pub autosave: bool,
    pub mt_seo_title: Option<String>,
    pub mt_seo_description: Option<String>,
    pub mt_seo_keywords: Option<String>,
    pub mt_seo_google_news_meta: Option<String>,
    pub mt_seo_meta: Option<String>,
}

impl ItemSeoForm {
    fn posted(self) -> Vec<(&'static str, String)> {
        [
            ("mt_seo_title", self.mt_seo_title),
            ("mt_seo_description", self.mt_seo_description),
            ("mt_seo_keywords", self.mt_seo_keywords),
            ("mt_seo_google_news_meta", self.mt_seo_google_news_meta),
            ("mt_seo_meta", self.mt_seo_meta),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect()
    }
}

/// Saves the per-item fields. Always answers 204: a refused or malformed
/// request is logged and otherwise ignored.
#[post("/items/<id>/seo", data = "<form>")]
pub fn item_seo_save(
    id: i64,
    capability: EditCapability,
    form: Option<Form<ItemSeoForm>>,
    store: &State<Arc<dyn Store>>,
    hooks: &State<Hooks>,
    cache: &State<CategoryCache>,
    nonces: &State<Nonces>,
) -> Status {
    let form = match form {
        Some(f) => f.into_inner(),
        None => {
            log::info!("Item {}: unreadable SEO form ignored", id);
            return Status::NoContent;
        }
    };
    let item = match store.item_find_by_id(id) {
        Some(i) => i,
        None => {
            log::info!("Item {}: not found, SEO form ignored", id);
            return Status::NoContent;
        }
    };

    let nonce = form.mt_seo_nonce.clone().unwrap_or_default();
    let is_autosave = form.autosave;
    let request = SaveRequest {
        method: "POST".to_string(),
        kind: item.kind.clone(),
        nonce,
        is_autosave,
        is_revision: item.kind == KIND_REVISION,
        can_edit: capability.0,
        fields: SaveRequest::fields_from_posted(form.posted()),
    };

    let meta = engine(store, hooks, cache);
    let outcome = save::save_item_fields(&meta, nonces, item.id, &request);
    log::debug!("Item {}: {:?}", item.id, outcome);
    Status::NoContent
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        settings_get,
        settings_save,
        item_seo_panel,
        item_seo_save,
    ]
}
