//! Task mapping and validation.

use super::{ImportKind, RecordKind};
use crate::io::fields::{FieldAliases, RawRow, is_present, leading_number, value_text};
use crate::io::validation::is_blank;
use crate::models::{Duration, DurationUnit, Priority, Task};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

const TITLE: FieldAliases =
    FieldAliases::new("task", &["task", "Task", "title", "Title", "name", "Name"]);
// The title columns come last so a sheet with only a title still fills the
// description.
const DESCRIPTION: FieldAliases = FieldAliases::new(
    "description",
    &["description", "Description", "desc", "Desc", "task", "Task"],
);
const PRIORITY: FieldAliases = FieldAliases::new("priority", &["priority", "Priority"]);
const DURATION: FieldAliases = FieldAliases::new(
    "estimated duration",
    &[
        "estimated_duration",
        "Estimated Duration",
        "duration",
        "Duration",
        "time",
        "Time",
    ],
);
const QUANTITY: FieldAliases = FieldAliases::new(
    "quantity",
    &["quantity", "Quantity", "duration_quantity", "Duration Quantity"],
);
const UNIT: FieldAliases =
    FieldAliases::new("unit", &["unit", "Unit", "duration_unit", "Duration Unit"]);

/// `<number><optional space><unit word>` anywhere in free text.
static FREE_TEXT_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(hours?|days?|hrs?|d)").unwrap_or_else(|_| unreachable!())
});

/// Event tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskKind;

impl RecordKind for TaskKind {
    type Record = Task;

    const KIND: ImportKind = ImportKind::Tasks;
    const NOUN: &'static str = "task";
    const COLLECTION_KEY: &'static str = "tasks";

    fn map(row: &RawRow) -> Task {
        Task {
            task: TITLE.text(row),
            description: DESCRIPTION.text(row),
            priority: Priority::normalize(&PRIORITY.text(row)),
            estimated_duration: coerce_duration(row),
        }
    }

    fn validate(row: &RawRow, task: &Task) -> Vec<String> {
        let mut errors = Vec::new();

        if is_blank(&task.task) {
            errors.push("Task name is required".to_string());
        }
        if is_blank(&task.description) {
            errors.push("Task description is required".to_string());
        }
        // Checked on the raw value: the mapper already replaced it.
        let unrecognized_priority = PRIORITY
            .resolve(row)
            .is_some_and(|raw| Priority::parse(&value_text(raw)).is_none());
        if unrecognized_priority {
            errors.push(r#"Invalid priority. Must be "high", "medium", or "low""#.to_string());
        }

        errors
    }
}

/// Recovers an estimated duration from whichever shape the row carries.
///
/// Shapes are tried in order and the first that yields a duration wins: a
/// structured `{quantity, unit}` object with both parts present, a free-text
/// string such as `"2 hours"` or `"3d"`, then separate quantity and unit
/// columns.
fn coerce_duration(row: &RawRow) -> Option<Duration> {
    let raw = DURATION.resolve(row);

    raw.and_then(Value::as_object)
        .and_then(|object| {
            let quantity = object.get("quantity").filter(|v| is_present(v))?;
            let unit = object.get("unit").filter(|v| is_present(v))?;
            Some(structured(quantity, unit))
        })
        .or_else(|| raw.and_then(Value::as_str).and_then(parse_free_text))
        .or_else(|| {
            let quantity = QUANTITY.resolve(row)?;
            let unit = UNIT.resolve(row)?;
            Some(structured(quantity, unit))
        })
}

fn structured(quantity: &Value, unit: &Value) -> Duration {
    Duration {
        quantity: leading_number(quantity),
        unit: DurationUnit::coerce(&value_text(unit)),
    }
}

/// Parses free text like `"1.5 hrs"` into a duration.
fn parse_free_text(text: &str) -> Option<Duration> {
    let captures = FREE_TEXT_DURATION.captures(text)?;
    let quantity = captures.get(1)?.as_str().parse::<f64>().ok();
    let unit = DurationUnit::from_free_text(captures.get(2)?.as_str());
    Some(Duration { quantity, unit })
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

    fn map_and_validate(value: Value) -> (Task, Vec<String>) {
        let raw = row(value);
        let task = TaskKind::map(&raw);
        let errors = TaskKind::validate(&raw, &task);
        (task, errors)
    }

    #[test]
    fn test_maps_structured_duration() {
        let (task, errors) = map_and_validate(json!({
            "task": "Setup venue",
            "description": "Arrange tables",
            "priority": "high",
            "estimated_duration": {"quantity": 2, "unit": "hours"}
        }));

        assert!(errors.is_empty());
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.estimated_duration, Some(Duration::hours(2.0)));
    }

    #[test_case("2 hours", 2.0, DurationUnit::Hours ; "hours")]
    #[test_case("1 Hour", 1.0, DurationUnit::Hours ; "singular capitalized")]
    #[test_case("3hrs", 3.0, DurationUnit::Hours ; "abbreviated no space")]
    #[test_case("1.5 HR", 1.5, DurationUnit::Hours ; "decimal upper")]
    #[test_case("4 days", 4.0, DurationUnit::Days ; "days")]
    #[test_case("about 2d", 2.0, DurationUnit::Days ; "d in prose")]
    fn test_free_text_duration(text: &str, quantity: f64, unit: DurationUnit) {
        let (task, _) = map_and_validate(json!({"Task": "A", "Duration": text}));
        assert_eq!(task.estimated_duration, Some(Duration::new(quantity, unit)));
    }

    #[test]
    fn test_separate_duration_columns() {
        let (task, _) = map_and_validate(json!({
            "Task": "A",
            "Duration Quantity": "3 hrs",
            "Duration Unit": "Days"
        }));
        assert_eq!(task.estimated_duration, Some(Duration::days(3.0)));
    }

    #[test]
    fn test_unknown_structured_unit_is_hours() {
        let (task, _) = map_and_validate(json!({
            "task": "A",
            "estimated_duration": {"quantity": "5", "unit": "weeks"}
        }));
        assert_eq!(task.estimated_duration, Some(Duration::hours(5.0)));
    }

    #[test]
    fn test_incomplete_object_falls_through_to_columns() {
        let (task, _) = map_and_validate(json!({
            "task": "A",
            "duration": {"quantity": 2},
            "quantity": 6,
            "unit": "days"
        }));
        assert_eq!(task.estimated_duration, Some(Duration::days(6.0)));
    }

    #[test_case(json!({"task": "A", "time": "soon"}) ; "unmatched text")]
    #[test_case(json!({"task": "A", "quantity": 2}) ; "quantity without unit")]
    #[test_case(json!({"task": "A", "duration": 3}) ; "bare number")]
    #[test_case(json!({"task": "A"}) ; "nothing")]
    fn test_no_duration(value: Value) {
        let (task, _) = map_and_validate(value);
        assert!(task.estimated_duration.is_none());
    }

    #[test]
    fn test_blank_row_with_bad_priority() {
        let (task, errors) = map_and_validate(json!({"Task": "", "Description": "", "Priority": "urgent"}));
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(
            errors,
            vec![
                "Task name is required",
                "Task description is required",
                r#"Invalid priority. Must be "high", "medium", or "low""#
            ]
        );
    }

    #[test]
    fn test_priority_is_case_insensitive_and_optional() {
        let (task, errors) = map_and_validate(json!({"task": "A", "desc": "B", "Priority": "LOW"}));
        assert!(errors.is_empty());
        assert_eq!(task.priority, Priority::Low);

        let (task, errors) = map_and_validate(json!({"task": "A", "desc": "B"}));
        assert!(errors.is_empty());
        assert_eq!(task.priority, Priority::Medium);
    }

    #[test]
    fn test_description_falls_back_to_title() {
        let (task, errors) = map_and_validate(json!({"Task": "Book DJ"}));
        assert!(errors.is_empty());
        assert_eq!(task.description, "Book DJ");

        let (task, _) = map_and_validate(json!({"Title": "Book DJ"}));
        assert!(task.description.is_empty());
    }

    #[test]
    fn test_whitespace_title_is_blank() {
        let (_, errors) = map_and_validate(json!({"title": "   ", "description": "x"}));
        assert_eq!(errors, vec!["Task name is required"]);
    }
}
