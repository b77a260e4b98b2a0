//! Query tokenization.

/// Ordered search terms derived from a raw query.
///
/// Terms keep their original casing and order, and duplicates are kept.
/// An empty term list means no match is possible and the record store must not be queried.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Terms(Vec<String>);

impl Terms {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Terms joined with single spaces, as shown in summary messages.
    pub fn joined(&self) -> String {
        self.0.join(" ")
    }
}

impl From<Vec<String>> for Terms {
    fn from(terms: Vec<String>) -> Self {
        Self(terms)
    }
}

impl<'a> IntoIterator for &'a Terms {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Splits a raw query on commas and whitespace, dropping empty fragments.
///
/// `None` and blank input both yield empty [`Terms`].
pub fn tokenize_query(raw: Option<&str>) -> Terms {
    let Some(raw) = raw else {
        return Terms::default();
    };

    raw.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(str::to_string)
        .collect::<Vec<_>>()
        .into()
}
