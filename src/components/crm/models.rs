use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Anything carrying OSDI identifiers (`"action_network:<uuid>"`, ...)
pub trait Identified {
    fn identifiers(&self) -> &[String];
}

/// CRM event
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Event {
    #[serde(default)]
    pub identifiers: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub start_date: Option<String>,
}

/// Email entry on a person
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EmailAddress {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub primary: bool,
}

/// Phone entry on a person
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PhoneNumber {
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub primary: bool,
}

/// CRM person
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Person {
    #[serde(default)]
    pub identifiers: Vec<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
    #[serde(default)]
    pub phone_numbers: Vec<PhoneNumber>,
}

/// RSVP of a person to an event
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Attendance {
    #[serde(default)]
    pub identifiers: Vec<String>,
    #[serde(
        rename = "action_network:person_id",
        default,
        deserialize_with = "null_as_default"
    )]
    pub person_id: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Read an explicit `null` the same as a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Identified for Event {
    fn identifiers(&self) -> &[String] {
        &self.identifiers
    }
}

impl Identified for Person {
    fn identifiers(&self) -> &[String] {
        &self.identifiers
    }
}

impl Identified for Attendance {
    fn identifiers(&self) -> &[String] {
        &self.identifiers
    }
}

/// One page of a HAL list response
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Page {
    #[serde(rename = "_embedded", default)]
    pub embedded: HashMap<String, Vec<Value>>,
    #[serde(rename = "_links", default)]
    pub links: HashMap<String, Value>,
}

impl Page {
    /// Href of the next page, if the response links one
    pub fn next_href(&self) -> Option<&str> {
        self.links
            .get("next")
            .and_then(|next| next.get("href"))
            .and_then(|href| href.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_person_id_reads_as_empty() {
        let attendance: Attendance = serde_json::from_value(json!({
            "action_network:person_id": null,
            "status": "accepted"
        }))
        .unwrap();
        assert_eq!(attendance.person_id, "");
        assert_eq!(attendance.status.as_deref(), Some("accepted"));
    }

    #[test]
    fn test_null_event_name_reads_as_empty() {
        let event: Event = serde_json::from_value(json!({
            "identifiers": ["action_network:e1"],
            "name": null
        }))
        .unwrap();
        assert_eq!(event.name, "");
    }
}
