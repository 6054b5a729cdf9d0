use super::models::{Identified, Person};

/// Strip the namespace prefix (`"source:"`) from an identifier
pub fn bare_id(id: &str) -> &str {
    match id.split_once(':') {
        Some((_, rest)) => rest,
        None => id,
    }
}

/// Bare form of an item's first identifier
pub fn extract_id<T: Identified + ?Sized>(item: &T) -> Option<String> {
    item.identifiers().first().map(|id| bare_id(id).to_string())
}

/// Find the person owning `person_id`.
///
/// Matches on substring so that both namespaced and bare ids resolve. An empty
/// id never matches.
pub fn find_person<'a>(person_id: &str, people: &'a [Person]) -> Option<&'a Person> {
    if person_id.is_empty() {
        return None;
    }
    people
        .iter()
        .find(|person| person.identifiers.iter().any(|id| id.contains(person_id)))
}

/// Primary email of a person, if any
pub fn primary_email(person: Option<&Person>) -> Option<String> {
    person?
        .email_addresses
        .iter()
        .find(|email| email.primary)
        .and_then(|email| email.address.clone())
}

/// Primary phone number of a person, if any
pub fn primary_phone(person: Option<&Person>) -> Option<String> {
    person?
        .phone_numbers
        .iter()
        .find(|phone| phone.primary)
        .and_then(|phone| phone.number.clone())
}
