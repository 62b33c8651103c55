//! Sparse updates: only fields the caller actually supplied are written.
//!
//! Each patch type declares its writable fields once, as a static list of
//! `(name, accessor, validator?)` entries. A field is present when its value is
//! not the zero value of its type, so an omitted or empty field never
//! overwrites what is stored.

use std::str::FromStr;

use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::Salary;
use crate::database::{DatabaseError, Document, Repository};

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("Invalid value '{value}' for field '{field}'")]
    InvalidFieldValue { field: &'static str, value: String },

    #[error("{0} not found")]
    ResourceNotFound(&'static str),

    #[error(transparent)]
    Storage(#[from] DatabaseError),
}

/// Zero-value test used to decide whether a patch field was supplied
pub trait Presence {
    fn is_present(&self) -> bool;
}

impl Presence for String {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl Presence for i64 {
    fn is_present(&self) -> bool {
        *self != 0
    }
}

impl Presence for bool {
    fn is_present(&self) -> bool {
        *self
    }
}

impl Presence for Uuid {
    fn is_present(&self) -> bool {
        !self.is_nil()
    }
}

impl<T> Presence for Vec<T> {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl Presence for Salary {
    fn is_present(&self) -> bool {
        *self != Salary::default()
    }
}

impl<T: Presence> Presence for Option<T> {
    fn is_present(&self) -> bool {
        self.as_ref().is_some_and(Presence::is_present)
    }
}

/// The field's JSON value when it was supplied
pub fn present<T: Presence + Serialize>(value: &T) -> Option<Value> {
    if !value.is_present() {
        return None;
    }
    serde_json::to_value(value).ok()
}

/// Validator for fields backed by a closed string enumeration
pub fn is_one_of<E: FromStr>(value: &Value) -> bool {
    value.as_str().is_some_and(|text| text.parse::<E>().is_ok())
}

/// One writable field of a patch type
pub struct PatchField<P> {
    pub name: &'static str,
    pub read: fn(&P) -> Option<Value>,
    pub validate: Option<fn(&Value) -> bool>,
}

impl<P> PatchField<P> {
    pub const fn plain(name: &'static str, read: fn(&P) -> Option<Value>) -> Self {
        Self { name, read, validate: None }
    }

    pub const fn checked(
        name: &'static str,
        read: fn(&P) -> Option<Value>,
        validate: fn(&Value) -> bool,
    ) -> Self {
        Self { name, read, validate: Some(validate) }
    }
}

/// A partially populated twin of a stored document
pub trait SparseUpdate: Sized + 'static {
    type Target: Document;

    fn fields() -> &'static [PatchField<Self>];
}

/// Collects the supplied fields, validating each one. Any invalid field fails the whole patch.
pub fn changed_fields<P: SparseUpdate>(patch: &P) -> Result<Map<String, Value>, UpdateError> {
    let mut set = Map::new();

    for field in P::fields() {
        let Some(value) = (field.read)(patch) else {
            continue;
        };

        if let Some(validate) = field.validate {
            if !validate(&value) {
                let value = match value {
                    Value::String(text) => text,
                    other => other.to_string(),
                };
                return Err(UpdateError::InvalidFieldValue { field: field.name, value });
            }
        }

        set.insert(field.name.to_string(), value);
    }

    Ok(set)
}

/// Writes the supplied fields plus `updatedAt` in one conditional write keyed on `id`,
/// then returns the stored document as it is after the write.
///
/// An empty patch still touches `updatedAt`.
pub async fn apply_partial_update<P: SparseUpdate>(
    resources: &Repository<P::Target>,
    id: Uuid,
    patch: &P,
) -> Result<P::Target, UpdateError> {
    let kind = <P::Target as Document>::KIND;

    let mut set = changed_fields(patch)?;
    tracing::debug!("Updating {} {} fields {:?}", kind, id, set.keys().collect::<Vec<_>>());
    set.insert("updatedAt".to_string(), json!(Utc::now()));

    if !resources.set_fields(id, set).await? {
        return Err(UpdateError::ResourceNotFound(kind));
    }

    resources
        .find_by_id(id)
        .await?
        .ok_or(UpdateError::ResourceNotFound(kind))
}
