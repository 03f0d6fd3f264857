//! Member mapping and validation.

use super::{ImportKind, RecordKind};
use crate::io::fields::{FieldAliases, RawRow, value_text};
use crate::io::validation::{is_valid_email, is_valid_phone};
use crate::models::{Member, MemberProfile};
use serde_json::Value;

const TYPE: FieldAliases = FieldAliases::new("type", &["type", "memberType", "Type", "Member Type"]);
const FIRST_NAME: FieldAliases =
    FieldAliases::new("first name", &["firstName", "first_name", "First Name", "First"]);
const LAST_NAME: FieldAliases =
    FieldAliases::new("last name", &["lastName", "last_name", "Last Name", "Last"]);
const NAME: FieldAliases = FieldAliases::new("name", &["name", "entityName", "Entity Name", "Name"]);
const OFFLINE: FieldAliases =
    FieldAliases::new("offline", &["offline", "isOffline", "Offline", "Is Offline"]);
const SPECIALIZED_IN: FieldAliases = FieldAliases::new(
    "specialized in",
    &[
        "specializedIn",
        "specialized_in",
        "Specialized In",
        "specialization",
        "Specialization",
    ],
);
const EXPERIENCE: FieldAliases = FieldAliases::new(
    "experience",
    &[
        "experience",
        "Experience",
        "experienceYears",
        "Experience Years",
        "Experience (Years)",
    ],
);
const ADDRESS: FieldAliases = FieldAliases::new("address", &["address", "Address"]);
const PHONE: FieldAliases =
    FieldAliases::new("phone", &["phone", "Phone", "phoneNumber", "Phone Number"]);
const WHATSAPP: FieldAliases =
    FieldAliases::new("whatsapp", &["whatsapp", "WhatsApp", "whatsApp", "Whats App"]);
const EMAIL: FieldAliases =
    FieldAliases::new("email", &["email", "Email", "emailAddress", "Email Address"]);

/// Tokens that mark an entity as offline, compared case-insensitively.
const TRUTHY_TOKENS: &[&str] = &["true", "yes", "1"];

/// Members: people and organizations.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberKind;

impl RecordKind for MemberKind {
    type Record = Member;

    const KIND: ImportKind = ImportKind::Members;
    const NOUN: &'static str = "member";
    const COLLECTION_KEY: &'static str = "members";

    fn map(row: &RawRow) -> Member {
        let first_name = FIRST_NAME.text(row);
        let last_name = LAST_NAME.text(row);
        let name = NAME.text(row);

        let profile = if infer_person(row, &first_name, &last_name, &name) {
            MemberProfile::Person {
                first_name,
                last_name,
            }
        } else {
            MemberProfile::Entity {
                name,
                offline: OFFLINE.resolve(row).is_some_and(is_truthy),
            }
        };

        Member {
            profile,
            specialized_in: SPECIALIZED_IN.text(row),
            experience: EXPERIENCE.text(row),
            address: ADDRESS.text(row),
            phone: PHONE.text(row),
            whatsapp: WHATSAPP.text(row),
            email: EMAIL.text(row),
        }
    }

    fn validate(_row: &RawRow, member: &Member) -> Vec<String> {
        let mut errors = Vec::new();

        let has_email = !member.email.is_empty();
        match &member.profile {
            MemberProfile::Person {
                first_name,
                last_name,
            } => {
                if first_name.is_empty() && last_name.is_empty() && !has_email {
                    errors.push(
                        "Person must have at least firstName, lastName, or email".to_string(),
                    );
                }
            },
            MemberProfile::Entity { name, .. } => {
                if name.is_empty() && !has_email {
                    errors.push("Entity must have at least name or email".to_string());
                }
            },
        }

        if !member.email.is_empty() && !is_valid_email(&member.email) {
            errors.push(format!("Invalid email format: {}", member.email));
        }
        if !member.phone.is_empty() && !is_valid_phone(&member.phone) {
            errors.push(format!("Invalid phone format: {}", member.phone));
        }

        errors
    }
}

/// Decides between person and entity.
///
/// An explicit `person`/`entity` type wins. Otherwise a row with both a first
/// and a last name is a person, a row with a name is an entity, and anything
/// else falls back to person.
fn infer_person(row: &RawRow, first_name: &str, last_name: &str, name: &str) -> bool {
    let explicit = TYPE.text(row).trim().to_lowercase();
    match explicit.as_str() {
        "person" => true,
        "entity" => false,
        _ if !first_name.is_empty() && !last_name.is_empty() => true,
        _ => name.is_empty(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        other => {
            let text = value_text(other).trim().to_lowercase();
            TRUTHY_TOKENS.contains(&text.as_str())
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    fn row(value: Value) -> RawRow {
        match value {
            Value::Object(map) => map,
            _ => RawRow::new(),
        }
    }

    fn map_and_validate(value: Value) -> (Member, Vec<String>) {
        let raw = row(value);
        let member = MemberKind::map(&raw);
        let errors = MemberKind::validate(&raw, &member);
        (member, errors)
    }

    #[test]
    fn test_maps_person_from_csv_headers() {
        let (member, errors) = map_and_validate(json!({
            "Type": "person",
            "First Name": "John",
            "Last Name": "Doe",
            "Email": "john@example.com"
        }));

        assert!(errors.is_empty());
        assert_eq!(member, Member::person("John", "Doe").with_email("john@example.com"));
    }

    #[test]
    fn test_explicit_type_is_normalized() {
        let (member, _) = map_and_validate(json!({"memberType": " Entity ", "firstName": "A", "lastName": "B"}));
        assert!(!member.profile.is_person());
    }

    #[test_case(json!({"firstName": "Ada", "lastName": "Lovelace"}), true ; "both names")]
    #[test_case(json!({"name": "Acme"}), false ; "entity name")]
    #[test_case(json!({"firstName": "Ada", "Entity Name": "Acme"}), false ; "one name plus entity name")]
    #[test_case(json!({"email": "x@example.com"}), true ; "nothing falls back to person")]
    #[test_case(json!({"type": "vendor", "Name": "Acme"}), false ; "unknown type is inferred")]
    fn test_type_inference(value: Value, is_person: bool) {
        let (member, _) = map_and_validate(value);
        assert_eq!(member.profile.is_person(), is_person);
    }

    #[test_case(json!(true), true)]
    #[test_case(json!("YES"), true)]
    #[test_case(json!("1"), true)]
    #[test_case(json!(1), true)]
    #[test_case(json!(" True "), true)]
    #[test_case(json!("no"), false)]
    #[test_case(json!("offline"), false)]
    #[test_case(json!(false), false)]
    fn test_offline_tokens(value: Value, expected: bool) {
        let (member, _) = map_and_validate(json!({"name": "Acme", "Is Offline": value}));
        assert_eq!(
            member.profile,
            MemberProfile::Entity {
                name: "Acme".to_string(),
                offline: expected
            }
        );
    }

    #[test]
    fn test_entity_with_bad_email() {
        let (member, errors) = map_and_validate(json!({"name": "Acme", "email": "bad-email"}));
        assert!(!member.profile.is_person());
        assert_eq!(errors, vec!["Invalid email format: bad-email"]);
    }

    #[test]
    fn test_collects_every_error_for_a_row() {
        let (_, errors) = map_and_validate(json!({"type": "entity", "phone": "call me"}));
        assert_eq!(
            errors,
            vec![
                "Entity must have at least name or email",
                "Invalid phone format: call me"
            ]
        );
    }

    #[test]
    fn test_whitespace_name_counts_as_supplied() {
        let (member, errors) = map_and_validate(json!({"type": "entity", "name": "  "}));
        assert!(!member.profile.is_person());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_person_needs_a_name_or_email() {
        let (_, errors) = map_and_validate(json!({"specializedIn": "Catering"}));
        assert_eq!(
            errors,
            vec!["Person must have at least firstName, lastName, or email"]
        );

        let (_, errors) = map_and_validate(json!({"Last": "Hopper"}));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_shared_fields_use_aliases() {
        let (member, errors) = map_and_validate(json!({
            "Entity Name": "Acme",
            "Specialization": "Sound",
            "Experience (Years)": "5-10",
            "Address": "1 Main St",
            "Phone Number": "+1 (555) 010-0000",
            "Whats App": "+15550100",
            "Email Address": "hi@acme.io"
        }));

        assert!(errors.is_empty());
        assert_eq!(member.specialized_in, "Sound");
        assert_eq!(member.experience, "5-10");
        assert_eq!(member.address, "1 Main St");
        assert_eq!(member.phone, "+1 (555) 010-0000");
        assert_eq!(member.whatsapp, "+15550100");
        assert_eq!(member.email, "hi@acme.io");
    }

    #[test]
    fn test_numeric_experience_renders_as_text() {
        let (member, _) = map_and_validate(json!({"name": "Acme", "experience": 7}));
        assert_eq!(member.experience, "7");
    }
}
