use std::collections::BTreeMap;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::hooks::SaveFieldEvent;
use crate::models::post::ContentItem;
use crate::models::settings::{
    is_truthy, EnabledFields, FieldDescriptor, SeoField, Settings, FIELD_DESCRIPTORS,
};
use crate::security::nonce::{Nonces, NONCE_FIELD, SEO_ACTION};
use crate::store::Store;

use super::front_end::MetaTags;
use super::kses::filter_meta_markup;
use super::text::{sanitize_text, truncate_chars};
use super::title::substitute_title;

pub const PREVIEW_TITLE_LENGTH: usize = 71;
pub const PREVIEW_DESCRIPTION_LENGTH: usize = 140;

// ── Per-item save ──────────────────────────────────────────

/// Everything the per-item save path needs to know about the request,
/// already pulled out of the transport.
#[derive(Debug, Clone, Default)]
pub struct SaveRequest {
    pub method: String,
    pub kind: String,
    pub nonce: String,
    pub is_autosave: bool,
    pub is_revision: bool,
    pub can_edit: bool,
    /// Posted values of the fields present in the request.
    pub fields: BTreeMap<SeoField, String>,
}

impl SaveRequest {
    /// Keep only posted keys that name a per-item field.
    pub fn fields_from_posted<'k>(posted: impl IntoIterator<Item = (&'k str, String)>) -> BTreeMap<SeoField, String> {
        posted
            .into_iter()
            .filter_map(|(key, value)| SeoField::from_key(key).map(|f| (f, value)))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    NotPost,
    UnsupportedKind,
    BadNonce,
    Autosave,
    Revision,
    NotAllowed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SaveOutcome {
    Skipped(SkipReason),
    Saved {
        set: Vec<SeoField>,
        deleted: Vec<SeoField>,
        failed: Vec<SeoField>,
    },
}

/// Store the posted per-item fields for `item_id`. Refused requests are
/// not errors: the outcome says why nothing happened.
pub fn save_item_fields(
    engine: &MetaTags<'_>,
    nonces: &Nonces,
    item_id: i64,
    request: &SaveRequest,
) -> SaveOutcome {
    let skip = if !request.method.eq_ignore_ascii_case("post") {
        Some(SkipReason::NotPost)
    } else if !engine.is_supported_kind(&request.kind) {
        Some(SkipReason::UnsupportedKind)
    } else if !nonces.verify(&request.nonce, SEO_ACTION) {
        Some(SkipReason::BadNonce)
    } else if request.is_autosave {
        Some(SkipReason::Autosave)
    } else if request.is_revision {
        Some(SkipReason::Revision)
    } else if !request.can_edit {
        Some(SkipReason::NotAllowed)
    } else {
        None
    };
    if let Some(reason) = skip {
        info!("Item {}: SEO fields not saved ({:?})", item_id, reason);
        return SaveOutcome::Skipped(reason);
    }

    let store = engine.store();
    let hooks = engine.hooks();
    let mut set = Vec::new();
    let mut deleted = Vec::new();
    let mut failed = Vec::new();

    for field in SeoField::ALL {
        let posted = match request.fields.get(&field) {
            Some(v) => v.clone(),
            None => continue,
        };
        let old = store.meta_get_string(item_id, field.key());

        let event = SaveFieldEvent {
            field,
            old_value: old.clone(),
            item_id,
        };
        let data = hooks.save_field.apply_with(posted, &event);
        let data = sanitize_field(field, &data);

        let result = if data.is_empty() && old.is_empty() {
            continue;
        } else if data == old {
            continue;
        } else if data.is_empty() {
            store.meta_delete(item_id, field.key()).map(|_| deleted.push(field))
        } else {
            store.meta_set(item_id, field.key(), &data).map(|_| set.push(field))
        };

        if let Err(e) = result {
            warn!("Item {}: failed to save {}: {}", item_id, field.key(), e);
            failed.push(field);
        }
    }

    for legacy in SeoField::ALL.iter().filter_map(|f| f.legacy_key()) {
        if let Err(e) = store.meta_delete(item_id, legacy) {
            warn!("Item {}: failed to remove {}: {}", item_id, legacy, e);
        }
    }

    debug!("Item {}: {} set, {} deleted", item_id, set.len(), deleted.len());
    SaveOutcome::Saved { set, deleted, failed }
}

/// Raw markup keeps only allowed meta elements; every other field is
/// plain single-line text.
fn sanitize_field(field: SeoField, value: &str) -> String {
    match field {
        SeoField::Meta => filter_meta_markup(value.trim()).trim().to_string(),
        _ => sanitize_text(value),
    }
}

// ── Settings save ──────────────────────────────────────────

/// The options panel as posted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SettingsForm {
    pub site_wide_meta: String,
    pub site_description: String,
    pub site_keywords: String,
    pub post_options: BTreeMap<String, Value>,
    pub page_options: BTreeMap<String, Value>,
    pub custom_post_types: BTreeMap<String, Value>,
}

impl SettingsForm {
    pub fn normalize(&self) -> Settings {
        Settings {
            site_wide_meta: self.site_wide_meta.trim().to_string(),
            site_description: self.site_description.trim().to_string(),
            site_keywords: self.site_keywords.trim().to_string(),
            post_options: field_flags(&self.post_options),
            page_options: field_flags(&self.page_options),
            custom_post_types: self
                .custom_post_types
                .iter()
                .filter(|(name, v)| !name.trim().is_empty() && is_truthy(v))
                .map(|(name, _)| (name.trim().to_string(), "1".to_string()))
                .collect(),
        }
    }
}

fn field_flags(posted: &BTreeMap<String, Value>) -> BTreeMap<String, String> {
    posted
        .iter()
        .filter(|(key, v)| SeoField::from_key(key).is_some() && is_truthy(v))
        .map(|(key, _)| (key.clone(), "1".to_string()))
        .collect()
}

/// Normalize and persist the options panel as one record.
pub fn save_settings(store: &dyn Store, form: &SettingsForm) -> Result<Settings, String> {
    let settings = form.normalize();
    store.settings_save(&settings)?;
    info!(
        "SEO settings saved ({} post fields, {} page fields, {} custom kinds)",
        settings.post_options.len(),
        settings.page_options.len(),
        settings.custom_post_types.len()
    );
    Ok(settings)
}

// ── Edit panel ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct PanelField {
    #[serde(flatten)]
    pub descriptor: &'static FieldDescriptor,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchPreview {
    pub title: String,
    pub url: String,
    pub date: String,
    pub description: String,
}

/// What the per-item edit panel shows.
#[derive(Debug, Clone, Serialize)]
pub struct ItemSeoPanel {
    pub item_id: i64,
    pub kind: String,
    pub enabled: EnabledFields,
    /// Set when no field is enabled for the kind; `fields` is then empty.
    pub message: Option<String>,
    pub fields: Vec<PanelField>,
    pub preview: Option<SearchPreview>,
    pub nonce_field: &'static str,
    pub nonce: String,
}

impl ItemSeoPanel {
    /// Panel data for `item`, or None when its kind is not supported.
    pub fn load(engine: &MetaTags<'_>, nonces: &Nonces, item: &ContentItem) -> Option<Self> {
        if !engine.is_supported_kind(&item.kind) {
            return None;
        }
        let enabled = engine.enabled_fields(&item.kind);
        let mut panel = ItemSeoPanel {
            item_id: item.id,
            kind: item.kind.clone(),
            enabled,
            message: None,
            fields: Vec::new(),
            preview: None,
            nonce_field: NONCE_FIELD,
            nonce: nonces.create(SEO_ACTION),
        };

        if !enabled.any() {
            panel.message = Some(
                "No SEO fields were enabled. Please enable post fields in the Meta Tags options page."
                    .to_string(),
            );
            return Some(panel);
        }

        let title = engine.item_field(item.id, SeoField::Title);
        let description = engine.item_field(item.id, SeoField::Description);
        let preview_title = if title.is_empty() {
            item.title.clone()
        } else {
            substitute_title(&title, &item.title)
        };

        panel.preview = Some(SearchPreview {
            title: truncate_chars(&preview_title, PREVIEW_TITLE_LENGTH).to_string(),
            url: format!("/{}", item.slug),
            date: item.created_at.format("%d %b %Y").to_string(),
            description: truncate_chars(&description, PREVIEW_DESCRIPTION_LENGTH).to_string(),
        });

        panel.fields = FIELD_DESCRIPTORS
            .iter()
            .filter(|d| enabled.is_enabled(d.field))
            .map(|d| PanelField {
                descriptor: d,
                value: match d.field {
                    SeoField::Title => title.clone(),
                    SeoField::Description => description.clone(),
                    other => engine.item_field(item.id, other),
                },
            })
            .collect();

        Some(panel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn settings_form_keeps_known_flags() {
        let form: SettingsForm = serde_json::from_value(json!({
            "site_wide_meta": "  <meta name=\"a\" content=\"b\" />  ",
            "site_description": " Desc ",
            "post_options": { "mt_seo_title": "1", "mt_seo_bogus": "1", "mt_seo_meta": "0" },
            "page_options": { "mt_seo_description": true },
            "custom_post_types": { "recipe": "on", " ": "1", "event": "" }
        }))
        .unwrap();
        let s = form.normalize();
        assert_eq!(s.site_wide_meta, "<meta name=\"a\" content=\"b\" />");
        assert_eq!(s.site_description, "Desc");
        assert_eq!(s.post_options.keys().collect::<Vec<_>>(), vec!["mt_seo_title"]);
        assert_eq!(s.page_options.get("mt_seo_description").map(String::as_str), Some("1"));
        assert_eq!(s.enabled_custom_kinds(), vec!["recipe".to_string()]);
    }

    #[test]
    fn fields_are_sanitized_by_kind() {
        assert_eq!(sanitize_field(SeoField::Title, " <b>Big</b>\n title "), "Big title");
        assert_eq!(
            sanitize_field(
                SeoField::Meta,
                "<meta name=\"robots\" content=\"noindex\" onclick=\"x\" /><script>bad()</script>"
            ),
            "<meta name=\"robots\" content=\"noindex\" />bad()"
        );
    }

    #[test]
    fn posted_keys_are_filtered() {
        let fields = SaveRequest::fields_from_posted(vec![
            ("mt_seo_title", "T".to_string()),
            ("post_title", "ignored".to_string()),
        ]);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get(&SeoField::Title).map(String::as_str), Some("T"));
    }
}
