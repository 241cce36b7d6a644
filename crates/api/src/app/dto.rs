use serde::{Deserialize, Serialize};

use chambers_core::{DomainError, DomainResult};
use chambers_infra::DirectoryError;
use chambers_people::{NewPerson, Person, PersonId, PersonPatch};

#[derive(Debug, Serialize)]
pub struct PeopleResponse {
    pub items: Vec<Person>,
}

/// Result of a directory mutation.
#[derive(Debug, Serialize)]
pub struct WriteOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WriteOutcome {
    pub fn created(id: &PersonId) -> Self {
        Self {
            success: true,
            id: Some(id.to_string()),
            error: None,
        }
    }

    pub fn ok() -> Self {
        Self {
            success: true,
            id: None,
            error: None,
        }
    }

    pub fn failed(err: &DirectoryError) -> Self {
        Self {
            success: false,
            id: None,
            error: Some(err.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub email: Option<String>,
    pub admin: bool,
}

pub fn validate_new_person(person: &NewPerson) -> DomainResult<()> {
    require_text("name", &person.name)?;
    require_text("role", &person.role)
}

pub fn validate_patch(patch: &PersonPatch) -> DomainResult<()> {
    if patch.is_empty() {
        return Err(DomainError::validation("no fields to update"));
    }
    if let Some(name) = &patch.name {
        require_text("name", name)?;
    }
    if let Some(role) = &patch.role {
        require_text("role", role)?;
    }
    Ok(())
}

fn require_text(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactRequest {
    /// Lengths count the raw input, whitespace included.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.chars().count() < 2 {
            return Err(DomainError::validation("Name must be at least 2 characters."));
        }
        if !is_valid_email(&self.email) {
            return Err(DomainError::validation("Please enter a valid email address."));
        }
        if self.message.chars().count() < 10 {
            return Err(DomainError::validation("Message must be at least 10 characters."));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ContactAck {
    pub success: bool,
    pub title: &'static str,
    pub description: &'static str,
}

impl ContactAck {
    pub fn sent() -> Self {
        Self {
            success: true,
            title: "Message Sent!",
            description: "Thank you for reaching out. We'll get back to you shortly.",
        }
    }
}

/// `local@domain.tld` with no whitespace and a dotted domain.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty())
}
