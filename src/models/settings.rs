use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Option key the whole settings record is stored under.
pub const OPTIONS_KEY: &str = "add_meta_tags_opts";

/// The five per-item SEO fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SeoField {
    Title,
    Description,
    Keywords,
    GoogleNewsMeta,
    Meta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Textarea,
}

/// How a per-item field is presented on the edit panel.
#[derive(Debug, Clone, Serialize)]
pub struct FieldDescriptor {
    pub field: SeoField,
    pub key: &'static str,
    pub label: &'static str,
    pub input: InputKind,
    pub help: &'static str,
}

pub static FIELD_DESCRIPTORS: [FieldDescriptor; 5] = [
    FieldDescriptor {
        field: SeoField::Title,
        key: "mt_seo_title",
        label: "Title",
        input: InputKind::Text,
        help: "If empty, the post title will be used. <br><b>To customize:</b> The <code>%title%</code> placeholder will be replaced with the post title.",
    },
    FieldDescriptor {
        field: SeoField::Description,
        key: "mt_seo_description",
        label: "Description",
        input: InputKind::Textarea,
        help: "If empty, the post excerpt will be used.",
    },
    FieldDescriptor {
        field: SeoField::Keywords,
        key: "mt_seo_keywords",
        label: "Keywords",
        input: InputKind::Text,
        help: "Provide a comma-delimited list of keywords. If empty, the post's categories and tags will be used. <br><b>To customize:</b> The <code>%cats%</code> placeholder will be replaced with the post's categories, and the <code>%tags%</code> placeholder will be replaced with the post's tags.",
    },
    FieldDescriptor {
        field: SeoField::GoogleNewsMeta,
        key: "mt_seo_google_news_meta",
        label: "Google News Keywords",
        input: InputKind::Text,
        help: "Provide a comma-delimited list of up to ten keywords. All keywords are given equal value. If empty, this tag will be skipped.",
    },
    FieldDescriptor {
        field: SeoField::Meta,
        key: "mt_seo_meta",
        label: "Additional Meta tags",
        input: InputKind::Textarea,
        help: "Provide the full XHTML code for each META tag to add. For example: <code>&lt;meta name=\"robots\" content=\"index,follow\" /&gt;</code>",
    },
];

impl SeoField {
    pub const ALL: [SeoField; 5] = [
        SeoField::Title,
        SeoField::Description,
        SeoField::Keywords,
        SeoField::GoogleNewsMeta,
        SeoField::Meta,
    ];

    /// Metadata key the field is stored under.
    pub fn key(self) -> &'static str {
        self.descriptor().key
    }

    pub fn descriptor(self) -> &'static FieldDescriptor {
        match self {
            SeoField::Title => &FIELD_DESCRIPTORS[0],
            SeoField::Description => &FIELD_DESCRIPTORS[1],
            SeoField::Keywords => &FIELD_DESCRIPTORS[2],
            SeoField::GoogleNewsMeta => &FIELD_DESCRIPTORS[3],
            SeoField::Meta => &FIELD_DESCRIPTORS[4],
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    /// Key of the third-party field read when this one is empty.
    pub fn legacy_key(self) -> Option<&'static str> {
        match self {
            SeoField::Title => Some("_yoast_wpseo_title"),
            SeoField::Description => Some("_yoast_wpseo_metadesc"),
            _ => None,
        }
    }
}

/// Which per-item fields are switched on for one content kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnabledFields {
    pub title: bool,
    pub description: bool,
    pub keywords: bool,
    pub google_news_meta: bool,
    pub meta: bool,
}

impl EnabledFields {
    pub fn from_flags(flags: &BTreeMap<String, String>) -> Self {
        let on = |f: SeoField| flags.get(f.key()).map(|v| v == "1").unwrap_or(false);
        EnabledFields {
            title: on(SeoField::Title),
            description: on(SeoField::Description),
            keywords: on(SeoField::Keywords),
            google_news_meta: on(SeoField::GoogleNewsMeta),
            meta: on(SeoField::Meta),
        }
    }

    pub fn is_enabled(&self, field: SeoField) -> bool {
        match field {
            SeoField::Title => self.title,
            SeoField::Description => self.description,
            SeoField::Keywords => self.keywords,
            SeoField::GoogleNewsMeta => self.google_news_meta,
            SeoField::Meta => self.meta,
        }
    }

    pub fn any(&self) -> bool {
        SeoField::ALL.into_iter().any(|f| self.is_enabled(f))
    }
}

/// Site-wide configuration, persisted as one JSON blob under [`OPTIONS_KEY`].
///
/// Flag maps hold `"1"` for every enabled entry; anything else stored there
/// is coerced on load, and a blob that is not an object loads as defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(deserialize_with = "lenient_string")]
    pub site_wide_meta: String,
    #[serde(deserialize_with = "lenient_string")]
    pub site_description: String,
    #[serde(deserialize_with = "lenient_string")]
    pub site_keywords: String,
    #[serde(deserialize_with = "flag_map")]
    pub post_options: BTreeMap<String, String>,
    #[serde(deserialize_with = "flag_map")]
    pub page_options: BTreeMap<String, String>,
    #[serde(deserialize_with = "flag_map")]
    pub custom_post_types: BTreeMap<String, String>,
}

impl Settings {
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<Settings>(raw) {
            Ok(s) => s,
            Err(e) => {
                warn!("Ignoring malformed {} option: {}", OPTIONS_KEY, e);
                Settings::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Custom kinds switched on in the options panel.
    pub fn enabled_custom_kinds(&self) -> Vec<String> {
        self.custom_post_types.keys().cloned().collect()
    }
}

pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn flag_map<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeMap<String, String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Object(map) => map
            .into_iter()
            .filter(|(_, v)| is_truthy(v))
            .map(|(k, _)| (k, "1".to_string()))
            .collect(),
        _ => BTreeMap::new(),
    })
}
