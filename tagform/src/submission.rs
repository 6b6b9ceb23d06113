use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::{FieldValue, UploadedFile};

/// Submitted request data, handed to a form explicitly by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub fields: IndexMap<String, String>,
    #[serde(default)]
    pub files: IndexMap<String, UploadedFile>,
}

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder helper adding one text value.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Builder helper adding one upload.
    pub fn file(mut self, name: impl Into<String>, file: UploadedFile) -> Self {
        self.files.insert(name.into(), file);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.files.is_empty()
    }

    /// Text values overlaid with uploads; an upload replaces a text value
    /// submitted under the same name.
    pub fn merged(&self) -> IndexMap<String, FieldValue> {
        let mut data: IndexMap<String, FieldValue> = self
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), FieldValue::Text(value.clone())))
            .collect();
        for (name, file) in &self.files {
            data.insert(name.clone(), FieldValue::File(file.clone()));
        }
        data
    }
}

impl<K, V> FromIterator<(K, V)> for Submission
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            files: IndexMap::new(),
        }
    }
}
