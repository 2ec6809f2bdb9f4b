//! Filter registry.
//!
//! Every point where outside code may observe or change a value is a typed
//! [`Filter`] on [`Hooks`]. The registry is built once at startup and handed
//! to the components that apply it; nothing is registered globally.

use crate::models::post::{ContentItem, ContentKind};
use crate::models::settings::SeoField;
use crate::models::term::Term;
use crate::seo::TagMap;

pub const DEFAULT_PRIORITY: i32 = 10;

type Callback<T, C> = Box<dyn Fn(T, &C) -> T + Send + Sync>;

/// An ordered chain of callbacks that each receive the current value and
/// a read-only context, and return the value for the next callback.
pub struct Filter<T, C: ?Sized = ()> {
    callbacks: Vec<(i32, Callback<T, C>)>,
}

impl<T, C: ?Sized> Default for Filter<T, C> {
    fn default() -> Self {
        Filter { callbacks: Vec::new() }
    }
}

impl<T, C: ?Sized> Filter<T, C> {
    /// Register a callback. Lower priorities run first; equal priorities
    /// run in registration order.
    pub fn add<F>(&mut self, priority: i32, callback: F)
    where
        F: Fn(T, &C) -> T + Send + Sync + 'static,
    {
        let pos = self
            .callbacks
            .iter()
            .position(|(p, _)| *p > priority)
            .unwrap_or(self.callbacks.len());
        self.callbacks.insert(pos, (priority, Box::new(callback)));
    }

    pub fn apply_with(&self, value: T, context: &C) -> T {
        self.callbacks
            .iter()
            .fold(value, |acc, (_, callback)| callback(acc, context))
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl<T> Filter<T, ()> {
    pub fn apply(&self, value: T) -> T {
        self.apply_with(value, &())
    }
}

/// Context handed to `save_field` callbacks.
#[derive(Debug, Clone)]
pub struct SaveFieldEvent {
    pub field: SeoField,
    pub old_value: String,
    pub item_id: i64,
}

#[derive(Default)]
pub struct Hooks {
    /// Description of a single post or page, before it enters the tag map.
    pub meta_description: Filter<String>,
    /// Excerpt as derived for an item.
    pub excerpt: Filter<String, ContentItem>,
    /// Comma-joined category names of an item.
    pub item_categories: Filter<String, [Term]>,
    /// Comma-joined tag names of an item.
    pub item_tags: Filter<String, [Term]>,
    /// Comma-joined top site categories; context is the names being joined.
    pub site_categories: Filter<String, [String]>,
    /// The logical tag map, before it is rendered.
    pub metatags_map: Filter<TagMap>,
    /// The rendered, newline-joined meta block.
    pub metatags_markup: Filter<String>,
    /// Names of the content kinds the per-item fields apply to.
    pub supported_kinds: Filter<Vec<String>>,
    /// Custom kinds offered on the options panel.
    pub registered_kinds: Filter<Vec<ContentKind>>,
    /// A per-item field value about to be saved.
    pub save_field: Filter<String, SaveFieldEvent>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_passes_value_through() {
        let f: Filter<String> = Filter::default();
        assert!(f.is_empty());
        assert_eq!(f.apply("x".to_string()), "x");
    }

    #[test]
    fn callbacks_run_by_priority_then_registration() {
        let mut f: Filter<String> = Filter::default();
        f.add(20, |v, _| v + "c");
        f.add(DEFAULT_PRIORITY, |v, _| v + "a");
        f.add(DEFAULT_PRIORITY, |v, _| v + "b");
        f.add(1, |v, _| v + "0");
        assert_eq!(f.len(), 4);
        assert_eq!(f.apply(String::new()), "0abc");
    }

    #[test]
    fn context_is_visible_to_callbacks() {
        let mut f: Filter<String, SaveFieldEvent> = Filter::default();
        f.add(DEFAULT_PRIORITY, |v, ev| {
            if v.is_empty() {
                ev.old_value.clone()
            } else {
                v
            }
        });
        let ev = SaveFieldEvent {
            field: SeoField::Title,
            old_value: "kept".to_string(),
            item_id: 3,
        };
        assert_eq!(f.apply_with(String::new(), &ev), "kept");
        assert_eq!(f.apply_with("new".to_string(), &ev), "new");
    }

    #[test]
    fn unsized_context() {
        let mut f: Filter<String, [String]> = Filter::default();
        f.add(DEFAULT_PRIORITY, |v, names| format!("{}:{}", v, names.len()));
        let names = vec!["a".to_string(), "b".to_string()];
        assert_eq!(f.apply_with("n".to_string(), names.as_slice()), "n:2");
    }
}
