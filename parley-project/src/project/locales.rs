use indexmap::IndexMap;
use serde::Deserialize;

/// Mapping from a requested locale token to the concrete codes it expands to.
///
/// ```toml
/// [locales]
/// en = ["en-US", "en-GB"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct LocaleTable(IndexMap<String, Vec<String>>);

impl LocaleTable {
    /// The concrete codes declared for `token`.
    pub fn get(&self, token: &str) -> Option<&[String]> {
        self.0.get(token).map(Vec::as_slice)
    }

    /// Iterate over `(token, codes)` entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K, V> FromIterator<(K, V)> for LocaleTable
where
    K: Into<String>,
    V: IntoIterator,
    V::Item: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into_iter().map(Into::into).collect()))
                .collect(),
        )
    }
}
