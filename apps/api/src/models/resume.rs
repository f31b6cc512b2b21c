use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Column and key under which the source file name is recorded.
pub const FILE_NAME_KEY: &str = "File Name";

/// One parsed resume: the model's top-level JSON object, key order preserved.
///
/// The field set is whatever the model returned. Nothing here checks it against
/// the schema the prompt asks for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParsedResume(Map<String, Value>);

impl ParsedResume {
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Sets "File Name", replacing any value the model produced under that key.
    pub fn set_file_name(&mut self, file_name: &str) {
        self.0
            .insert(FILE_NAME_KEY.to_string(), Value::String(file_name.to_string()));
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.0.values()
    }
}

#[cfg(test)]
impl ParsedResume {
    pub fn file_name(&self) -> Option<&str> {
        self.0.get(FILE_NAME_KEY).and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}
