use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The single reserved field every record must carry.
pub const ID_FIELD: &str = "id";

#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum RecordValidateErr {
    #[error("record is missing an 'id' field")]
    MissingId,

    #[error("record 'id' must be a number")]
    IdNotANumber,

    #[error("record 'id' must be a non-negative integer")]
    IdNotUint,
}

/// A schemaless record: an open mapping from field name to any
/// JSON-representable value. The only constrained field is [`ID_FIELD`],
/// which must validate as a non-negative integer and is immutable once the
/// record is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Checks the `id` field and normalizes it to its canonical
    /// unsigned-integer representation, returning the canonical id.
    ///
    /// JSON numbers arrive as integers or floats depending on how the client
    /// spelled them; a float with no fractional part (e.g. `30.0`) is
    /// accepted and canonicalized to `30`.
    pub fn validate(&mut self) -> Result<u64, RecordValidateErr> {
        let id = match self.fields.get(ID_FIELD) {
            None => return Err(RecordValidateErr::MissingId),
            Some(Value::Number(n)) => {
                if let Some(id) = n.as_u64() {
                    id
                } else {
                    let f = n.as_f64().ok_or(RecordValidateErr::IdNotUint)?;
                    if f < 0.0 || f.fract() != 0.0 || f > u64::MAX as f64 {
                        return Err(RecordValidateErr::IdNotUint);
                    }
                    f as u64
                }
            }
            Some(_) => return Err(RecordValidateErr::IdNotANumber),
        };
        self.fields.insert(ID_FIELD.to_owned(), Value::from(id));
        Ok(id)
    }

    /// Returns the record's id only if it is already in canonical form.
    /// Records that have not passed [`Record::validate`] yield `None`.
    pub fn id(&self) -> Option<u64> {
        self.fields.get(ID_FIELD)?.as_u64()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}
