use std::collections::HashMap;

use crate::config::Event;
use crate::tags::{sanitize_community_name, sanitize_tag};

/// The two independent lookup spaces of tag-indexed content. A topic slug
/// and a community slug that happen to be spelled the same are different
/// keys.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum TagNamespace {
    /// General topic, read from the `tag` column.
    Topic,
    /// Community or group, read from the `tag2` column.
    Community,
}

#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct ContentKey {
    pub namespace: TagNamespace,
    pub slug: String,
}

impl ContentKey {
    /// Builds a key from text typed by a user, sanitized for its namespace.
    /// `None` when nothing usable is left.
    pub fn from_user_input(namespace: TagNamespace, text: &str) -> Option<ContentKey> {
        let slug = match namespace {
            TagNamespace::Topic => sanitize_tag(text),
            TagNamespace::Community => sanitize_community_name(text),
        };
        if slug.is_empty() {
            None
        } else {
            Some(ContentKey { namespace, slug })
        }
    }
}

impl Event {
    /// The key for the content of this event in `namespace`: `tag` for
    /// topics, `tag2` for communities. An empty column gives `None`; the
    /// other column is never used in its place.
    pub fn content_key(&self, namespace: TagNamespace) -> Option<ContentKey> {
        let slug = match namespace {
            TagNamespace::Topic => &self.tag,
            TagNamespace::Community => &self.tag2,
        };
        if slug.is_empty() {
            None
        } else {
            Some(ContentKey {
                namespace,
                slug: slug.clone(),
            })
        }
    }
}

/// Content filed under content keys, such as posts fetched for a tag.
#[derive(Debug, Clone)]
pub struct ContentIndex<T> {
    entries: HashMap<ContentKey, Vec<T>>,
}

impl<T> ContentIndex<T> {
    pub fn new() -> ContentIndex<T> {
        ContentIndex {
            entries: HashMap::new(),
        }
    }

    pub fn insert(&mut self, key: ContentKey, item: T) {
        self.entries.entry(key).or_default().push(item);
    }

    /// The items filed under exactly this namespace and slug, in insertion
    /// order.
    pub fn lookup(&self, key: &ContentKey) -> &[T] {
        self.entries.get(key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// The content of an event in one namespace.
    pub fn for_event(&self, event: &Event, namespace: TagNamespace) -> &[T] {
        match event.content_key(namespace) {
            Some(key) => self.lookup(&key),
            None => &[],
        }
    }
}

impl<T> Default for ContentIndex<T> {
    fn default() -> Self {
        ContentIndex::new()
    }
}
