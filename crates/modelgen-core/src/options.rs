use std::collections::BTreeSet;

/// Free-form options forwarded verbatim to a generator.
///
/// Entries are either bare flags (`noindexes`) or `key=value` pairs. Nothing
/// outside a generator interprets them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorOptions {
    values: BTreeSet<String>,
}

impl GeneratorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, option: impl Into<String>) {
        self.values.insert(option.into());
    }

    pub fn contains(&self, flag: &str) -> bool {
        self.values.contains(flag)
    }

    /// Value of the first `key=value` entry for `key`.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.iter().find_map(|entry| {
            entry
                .split_once('=')
                .filter(|(name, _)| *name == key)
                .map(|(_, value)| value)
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for GeneratorOptions {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(Into::into).collect(),
        }
    }
}
