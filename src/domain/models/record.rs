use serde_derive::{Deserialize, Serialize};
use serde_json::Value;

/// One element of the frame list, kept exactly as the endpoint sent it.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct Record(Value);
impl Record {
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Top-level field of an object record. Other shapes have no fields.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.as_object().and_then(|x| x.get(name))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0
            .as_object()
            .into_iter()
            .flat_map(|x| x.keys().map(|k| k.as_str()))
    }
}
impl From<Value> for Record {
    fn from(v: Value) -> Self {
        Self(v)
    }
}
