//! Registration validator
//!
//! Maps an untrusted JSON object to a [`NormalizedRegistration`] or to the
//! complete list of field-level messages.
//!
//! Validation semantics:
//! - Batch, not fail-fast: every rule contributes to one list
//! - A format rule runs only when its field is present, so a missing field
//!   reports exactly one message
//! - The team-size consistency rule runs only when nothing else failed
//! - No I/O, no side effects

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::errors::ValidationErrors;
use super::model::{
    Member, NormalizedRegistration, MAX_ADDITIONAL_MEMBERS, MAX_TEAM_SIZE, MIN_TEAM_SIZE,
};

/// Fields that must be present and non-empty.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "team_name",
    "problem_track",
    "team_size",
    "lead_name",
    "lead_email",
    "lead_phone",
];

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("phone pattern compiles"));

/// Whether `email` has the `local@domain.tld` shape.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Whether `phone` is exactly ten ASCII digits.
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// Validate and normalize a raw registration submission.
pub fn validate(raw: &Map<String, Value>) -> Result<NormalizedRegistration, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    for field in REQUIRED_FIELDS {
        if is_missing(raw.get(field)) {
            errors.push(format!("'{}' is required.", field));
        }
    }

    let team_size = match present(raw, "team_size") {
        Some(value) => match parse_integer(value) {
            Some(n) => {
                if !(MIN_TEAM_SIZE..=MAX_TEAM_SIZE).contains(&n) {
                    errors.push(format!(
                        "'team_size' must be between {} and {}.",
                        MIN_TEAM_SIZE, MAX_TEAM_SIZE
                    ));
                }
                Some(n)
            }
            None => {
                errors.push("'team_size' must be an integer.");
                None
            }
        },
        None => None,
    };

    let lead_email = present(raw, "lead_email").map(normalize_email);
    if let Some(ref email) = lead_email {
        if !is_valid_email(email) {
            errors.push("'lead_email' is not a valid email address.");
        }
    }

    let lead_phone = present(raw, "lead_phone").map(|v| text(v).trim().to_string());
    if let Some(ref phone) = lead_phone {
        if !is_valid_phone(phone) {
            errors.push("'lead_phone' must be a 10-digit number.");
        }
    }

    let entries: &[Value] = match raw.get("members") {
        None | Some(Value::Null) => &[],
        Some(Value::Array(items)) => items.as_slice(),
        Some(_) => {
            errors.push("'members' must be an array.");
            &[]
        }
    };

    if entries.len() > MAX_ADDITIONAL_MEMBERS {
        errors.push(format!(
            "Additional team members cannot exceed {}.",
            MAX_ADDITIONAL_MEMBERS
        ));
    }

    if let Some(size) = team_size {
        if errors.is_empty() {
            let total = 1 + entries.len() as i64;
            if total != size {
                errors.push(format!(
                    "team_size is {} but total count (lead + additional) is {}.",
                    size, total
                ));
            }
        }
    }

    let mut members = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let Some(obj) = entry.as_object() else {
            errors.push(format!("members[{}] must be an object.", i));
            continue;
        };

        let name = obj.get("member_name");
        if is_missing(name) {
            errors.push(format!("members[{}]: 'member_name' is required.", i));
        }

        let email = present(obj, "member_email").map(normalize_email);
        if let Some(ref email) = email {
            if !is_valid_email(email) {
                errors.push(format!("members[{}]: 'member_email' is not valid.", i));
            }
        }

        members.push(Member {
            member_name: name.map(|v| text(v).trim().to_string()).unwrap_or_default(),
            member_email: email,
        });
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    // Every field below passed the required check, so the lookups cannot fail.
    let field = |name: &str| {
        raw.get(name)
            .map(|v| text(v).trim().to_string())
            .unwrap_or_default()
    };

    Ok(NormalizedRegistration {
        team_name: field("team_name"),
        problem_track: field("problem_track"),
        team_size: team_size.and_then(|n| u8::try_from(n).ok()).unwrap_or_default(),
        lead_name: field("lead_name"),
        lead_email: lead_email.unwrap_or_default(),
        lead_phone: lead_phone.unwrap_or_default(),
        members,
    })
}

/// A field is missing when absent, null, false, blank, or an empty container.
/// Numbers are always present, zero included.
fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(Value::Number(_)) => false,
    }
}

fn present<'a>(obj: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    let value = obj.get(field);
    if is_missing(value) {
        None
    } else {
        value
    }
}

/// Textual rendering of a scalar; strings are taken verbatim.
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn normalize_email(value: &Value) -> String {
    text(value).trim().to_lowercase()
}

/// Integers, integral floats, booleans (`true` is 1), and strings holding an
/// integer. Magnitudes beyond `i64` saturate so the range check reports them.
fn parse_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => parse_integer_text(s.trim()),
        _ => None,
    }
}

fn parse_integer_text(s: &str) -> Option<i64> {
    if let Ok(n) = s.parse::<i64>() {
        return Some(n);
    }
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    fn valid_submission() -> Value {
        json!({
            "team_name": "  Byte Busters ",
            "problem_track": "FinTech",
            "team_size": 2,
            "lead_name": "Asha",
            "lead_email": " Asha@Example.com ",
            "lead_phone": "9876543210",
            "members": [{"member_name": "Ravi"}]
        })
    }

    fn errors_for(value: Value) -> Vec<String> {
        validate(&as_map(value)).unwrap_err().into_messages()
    }

    #[test]
    fn test_valid_submission_is_normalized() {
        let normalized = validate(&as_map(valid_submission())).unwrap();
        assert_eq!(normalized.team_name, "Byte Busters");
        assert_eq!(normalized.team_size, 2);
        assert_eq!(normalized.lead_email, "asha@example.com");
        assert_eq!(normalized.members, vec![Member::new("Ravi", None)]);
    }

    #[test]
    fn test_each_missing_field_reports_exactly_once() {
        for field in REQUIRED_FIELDS {
            let mut submission = as_map(valid_submission());
            submission.remove(field);
            let errors = validate(&submission).unwrap_err().into_messages();
            assert_eq!(errors, vec![format!("'{}' is required.", field)], "field {}", field);
        }
    }

    #[test]
    fn test_blank_and_null_count_as_missing() {
        let mut submission = valid_submission();
        submission["team_name"] = json!("   ");
        submission["lead_name"] = Value::Null;
        let errors = errors_for(submission);
        assert_eq!(
            errors,
            vec!["'team_name' is required.", "'lead_name' is required."]
        );
    }

    #[test]
    fn test_numeric_zero_is_present() {
        let mut submission = valid_submission();
        submission["team_size"] = json!(0);
        let errors = errors_for(submission);
        assert_eq!(errors, vec!["'team_size' must be between 1 and 5."]);
    }

    #[test]
    fn test_team_size_accepts_numeric_strings() {
        let mut submission = valid_submission();
        submission["team_size"] = json!(" 2 ");
        assert_eq!(validate(&as_map(submission)).unwrap().team_size, 2);

        let mut submission = valid_submission();
        submission["team_size"] = json!(2.0);
        assert_eq!(validate(&as_map(submission)).unwrap().team_size, 2);
    }

    #[test]
    fn test_team_size_not_integer() {
        let mut submission = valid_submission();
        submission["team_size"] = json!("two");
        assert_eq!(errors_for(submission), vec!["'team_size' must be an integer."]);

        let mut submission = valid_submission();
        submission["team_size"] = json!(2.5);
        assert_eq!(errors_for(submission), vec!["'team_size' must be an integer."]);
    }

    #[test]
    fn test_team_size_out_of_range() {
        let mut submission = valid_submission();
        submission["team_size"] = json!(6);
        assert_eq!(errors_for(submission), vec!["'team_size' must be between 1 and 5."]);
    }

    #[test]
    fn test_team_size_true_counts_as_one() {
        let mut submission = valid_submission();
        submission["team_size"] = json!(true);
        assert_eq!(
            errors_for(submission),
            vec!["team_size is 1 but total count (lead + additional) is 2."]
        );

        let mut submission = valid_submission();
        submission["team_size"] = json!(true);
        submission["members"] = json!([]);
        assert_eq!(validate(&as_map(submission)).unwrap().team_size, 1);
    }

    #[test]
    fn test_team_size_beyond_i64_is_out_of_range() {
        let huge = [
            json!(1e20),
            json!(-1e20),
            json!(u64::MAX),
            json!("99999999999999999999"),
            json!("-99999999999999999999"),
        ];
        for value in huge {
            let mut submission = valid_submission();
            submission["team_size"] = value.clone();
            assert_eq!(
                errors_for(submission),
                vec!["'team_size' must be between 1 and 5."],
                "value {}",
                value
            );
        }

        let mut submission = valid_submission();
        submission["team_size"] = json!("1e20");
        assert_eq!(errors_for(submission), vec!["'team_size' must be an integer."]);
    }

    #[test]
    fn test_invalid_email_and_phone_accumulate() {
        let mut submission = valid_submission();
        submission["lead_email"] = json!("asha@example");
        submission["lead_phone"] = json!("98765-43210");
        assert_eq!(
            errors_for(submission),
            vec![
                "'lead_email' is not a valid email address.",
                "'lead_phone' must be a 10-digit number.",
            ]
        );
    }

    #[test]
    fn test_numeric_phone_is_accepted() {
        let mut submission = valid_submission();
        submission["lead_phone"] = json!(9876543210_u64);
        assert_eq!(validate(&as_map(submission)).unwrap().lead_phone, "9876543210");
    }

    #[test]
    fn test_size_mismatch_message() {
        let mut submission = valid_submission();
        submission["members"] = json!([]);
        assert_eq!(
            errors_for(submission),
            vec!["team_size is 2 but total count (lead + additional) is 1."]
        );
    }

    #[test]
    fn test_size_mismatch_suppressed_by_prior_error() {
        let mut submission = as_map(valid_submission());
        submission.insert("team_size".to_string(), json!(3));
        submission.remove("lead_phone");
        let errors = validate(&submission).unwrap_err().into_messages();
        assert_eq!(errors, vec!["'lead_phone' is required."]);
    }

    #[test]
    fn test_members_not_array() {
        let mut submission = valid_submission();
        submission["team_size"] = json!(1);
        submission["members"] = json!({"member_name": "Ravi"});
        assert_eq!(errors_for(submission), vec!["'members' must be an array."]);
    }

    #[test]
    fn test_null_members_means_none() {
        let mut submission = valid_submission();
        submission["team_size"] = json!(1);
        submission["members"] = Value::Null;
        assert!(validate(&as_map(submission)).unwrap().members.is_empty());
    }

    #[test]
    fn test_too_many_members_still_checks_each_entry() {
        let mut submission = valid_submission();
        submission["team_size"] = json!(5);
        submission["members"] = json!([
            {"member_name": "A"},
            {"member_name": "B"},
            {"member_name": "C"},
            {"member_name": "D"},
            {"member_email": "e@example.com"}
        ]);
        assert_eq!(
            errors_for(submission),
            vec![
                "Additional team members cannot exceed 4.",
                "members[4]: 'member_name' is required.",
            ]
        );
    }

    #[test]
    fn test_member_errors_are_indexed() {
        let mut submission = valid_submission();
        submission["team_size"] = json!(4);
        submission["members"] = json!([
            {"member_name": "Ravi", "member_email": "not-an-email"},
            "Meera",
            {"member_name": "Kiran", "member_email": "KIRAN@Example.com"}
        ]);
        assert_eq!(
            errors_for(submission),
            vec![
                "members[0]: 'member_email' is not valid.",
                "members[1] must be an object.",
            ]
        );
    }

    #[test]
    fn test_member_fields_are_cleaned() {
        let mut submission = valid_submission();
        submission["team_size"] = json!(3);
        submission["members"] = json!([
            {"member_name": " Ravi ", "member_email": " RAVI@Example.com ", "role": "designer"},
            {"member_name": "Meera", "member_email": ""}
        ]);
        let normalized = validate(&as_map(submission)).unwrap();
        assert_eq!(
            normalized.members,
            vec![
                Member::new("Ravi", Some("ravi@example.com".to_string())),
                Member::new("Meera", None),
            ]
        );
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a b@c.io"));
        assert!(!is_valid_email("a@@c.io"));
        assert!(!is_valid_email("@c.io"));
        assert!(!is_valid_email("a@c"));
    }

    #[test]
    fn test_phone_shape() {
        assert!(is_valid_phone("0123456789"));
        assert!(!is_valid_phone("012345678"));
        assert!(!is_valid_phone("01234567890"));
        assert!(!is_valid_phone("012345678a"));
    }
}
