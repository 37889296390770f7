use std::collections::HashSet;

/// Key used to recognise the same result when it shows up more than once.
///
/// Ids and urls live in separate namespaces, an id of `"x"` never matches a url of `"x"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentityKey {
    Id(String),
    Url(String),
}

/// A search result with a stable identity.
pub trait SearchItem {
    /// Stable id of the item, stringified. Any value returned here counts, including `"0"` and `""`.
    fn id(&self) -> Option<String>;

    /// Fallback identity for items without an id.
    fn url(&self) -> Option<&str>;

    /// The id if there is one, else the url. `None` when the item has neither.
    fn identity_key(&self) -> Option<IdentityKey> {
        match self.id() {
            Some(id) => Some(IdentityKey::Id(id)),
            None => self.url().map(|url| IdentityKey::Url(url.to_owned())),
        }
    }
}

impl SearchItem for serde_json::Value {
    fn id(&self) -> Option<String> {
        match self.get("id")? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    fn url(&self) -> Option<&str> {
        self.get("url")?.as_str()
    }
}

/// Keep the first occurrence of every identity key, in their original order.
///
/// Items without any identity key can't be matched against anything and are always kept.
pub fn dedup_by_identity<T: SearchItem>(items: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| match item.identity_key() {
            Some(key) => seen.insert(key),
            None => true,
        })
        .collect()
}
