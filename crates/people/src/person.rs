use core::cmp::Ordering;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use chambers_core::{DocumentId, DomainError, Entity};

/// Person identifier (the store-assigned document id).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub DocumentId);

impl PersonId {
    pub fn new(id: DocumentId) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl core::fmt::Display for PersonId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for PersonId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(DocumentId::from_str(s)?))
    }
}

/// Person type: drives sort precedence and which optional fields are populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonType {
    Leadership,
    Associate,
}

impl PersonType {
    /// Sort precedence within the directory (lower sorts first).
    pub fn rank(self) -> u8 {
        match self {
            PersonType::Leadership => 0,
            PersonType::Associate => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PersonType::Leadership => "leadership",
            PersonType::Associate => "associate",
        }
    }
}

impl core::fmt::Display for PersonType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field set of a person that does not exist yet (no id).
///
/// This is also the shape of a stored document: the id lives outside the
/// document body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPerson {
    pub name: String,
    pub role: String,
    #[serde(rename = "type")]
    pub kind: PersonType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark_cases_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark_cases: Option<Vec<String>>,
}

impl NewPerson {
    /// A record carrying only the required fields.
    pub fn basic(name: impl Into<String>, role: impl Into<String>, kind: PersonType) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            kind,
            content: None,
            landmark_cases_title: None,
            landmark_cases: None,
        }
    }

    /// Document body for the store (absent optional fields are omitted).
    pub fn to_document(&self) -> serde_json::Result<Map<String, JsonValue>> {
        to_object(self)
    }
}

/// A directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub role: String,
    #[serde(rename = "type")]
    pub kind: PersonType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark_cases_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark_cases: Option<Vec<String>>,
}

impl Person {
    pub fn from_parts(id: PersonId, fields: NewPerson) -> Self {
        Self {
            id,
            name: fields.name,
            role: fields.role,
            kind: fields.kind,
            content: fields.content,
            landmark_cases_title: fields.landmark_cases_title,
            landmark_cases: fields.landmark_cases,
        }
    }

    /// Rebuild a person from a stored document body.
    ///
    /// Any `id` key inside the body is ignored; the store's id wins.
    pub fn from_document(id: PersonId, document: Map<String, JsonValue>) -> serde_json::Result<Self> {
        let fields: NewPerson = serde_json::from_value(JsonValue::Object(document))?;
        Ok(Self::from_parts(id, fields))
    }
}

impl Entity for Person {
    type Id = PersonId;

    const KIND: &'static str = "person";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Partial update: any subset of fields except the id.
///
/// Fields left as `None` are not touched by the update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<PersonType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark_cases_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark_cases: Option<Vec<String>>,
}

impl PersonPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// The fields to merge into the stored document.
    pub fn to_fields(&self) -> serde_json::Result<Map<String, JsonValue>> {
        to_object(self)
    }
}

fn to_object<T: Serialize>(value: &T) -> serde_json::Result<Map<String, JsonValue>> {
    match serde_json::to_value(value)? {
        JsonValue::Object(map) => Ok(map),
        other => Err(serde::ser::Error::custom(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

/// Total directory order.
///
/// All leadership entries precede all associates; within a group, names compare
/// case-insensitively. Exact name and then id break remaining ties so the order
/// is deterministic.
pub fn directory_order(a: &Person, b: &Person) -> Ordering {
    a.kind
        .rank()
        .cmp(&b.kind.rank())
        .then_with(|| cmp_ignore_case(&a.name, &b.name))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id().cmp(b.id()))
}

/// Sort a directory listing in place.
pub fn sort_directory(people: &mut [Person]) {
    people.sort_by(directory_order);
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}
