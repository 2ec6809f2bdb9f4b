pub mod excerpt;
pub mod front_end;
pub mod kses;
pub mod metatag;
pub mod save;
pub mod terms;
pub mod text;
pub mod title;

// Re-export commonly used items
pub use front_end::{MetaTags, PageContext};
pub use metatag::{create_metatag, create_metatags};
pub use title::TitleParts;

pub const TAG_DESCRIPTION: &str = "description";
pub const TAG_KEYWORDS: &str = "keywords";
pub const TAG_NEWS_KEYWORDS: &str = "news_keywords";
pub const TAG_CUSTOM: &str = "custom";
pub const TAG_SITE_WIDE: &str = "site_wide";

/// Logical tag name to raw value, in insertion order. Inserting an
/// existing name replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMap {
    entries: Vec<(String, String)>,
}

impl TagMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_first_position() {
        let mut map = TagMap::new();
        map.insert(TAG_DESCRIPTION, "a");
        map.insert(TAG_KEYWORDS, "b");
        map.insert(TAG_DESCRIPTION, "c");
        assert_eq!(map.names(), vec![TAG_DESCRIPTION, TAG_KEYWORDS]);
        assert_eq!(map.get(TAG_DESCRIPTION), Some("c"));
    }

    #[test]
    fn remove_entry() {
        let mut map = TagMap::new();
        map.insert(TAG_CUSTOM, "x");
        assert!(map.contains(TAG_CUSTOM));
        assert_eq!(map.remove(TAG_CUSTOM).as_deref(), Some("x"));
        assert!(map.remove(TAG_CUSTOM).is_none());
        assert!(map.is_empty());
    }
}
