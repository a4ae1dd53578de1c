use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/**
Application state attached to one session identifier.

The payload is a map of json-typed values with typed accessors, so the
same record shape serves every variant of the playground (the counter
demo stores a single integer under `"count"`). A record also carries a
monotonic `version`, advanced by the store on every successful save
and used for conflict detection; application code never modifies it.
*/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    id: String,
    version: u64,
    data: BTreeMap<String, Value>,

    #[serde(skip)]
    data_changed: bool,
}

impl PartialEq for SessionRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.version == other.version && self.data == other.data
    }
}

impl SessionRecord {
    /// Constructs a fresh zero-valued record for the given
    /// identifier, at version 0 with an empty payload.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: 0,
            data: BTreeMap::new(),
            data_changed: false,
        }
    }

    /// the session identifier this record is keyed by
    pub fn id(&self) -> &str {
        &self.id
    }

    /// the version of durable storage this record was loaded at (or
    /// last saved as)
    pub fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn advance_version(&mut self) {
        self.version += 1;
    }

    /// Retrieves a value from the payload, deserialized as `T`.
    /// Returns `None` if the key is absent or holds a value of
    /// another shape.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .cloned()
            .and_then(|value| serde_json::from_value(value).ok())
    }

    /// Inserts a serializable value into the payload, marking the
    /// record changed if the stored value actually differs.
    pub fn insert(&mut self, key: &str, value: impl Serialize) -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(value)?;
        if self.data.get(key) != Some(&value) {
            self.data.insert(String::from(key), value);
            self.data_changed = true;
        }
        Ok(())
    }

    /// Removes a key from the payload.
    pub fn remove(&mut self, key: &str) {
        if self.data.remove(key).is_some() {
            self.data_changed = true;
        }
    }

    /// true if the payload has been mutated since this record was
    /// loaded or last saved
    pub fn data_changed(&self) -> bool {
        self.data_changed
    }

    /// Clears the changed flag, normally after a successful save.
    pub fn reset_data_changed(&mut self) {
        self.data_changed = false;
    }
}
