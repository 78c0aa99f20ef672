use std::path::Path;
use std::path::PathBuf;

use assert_json_diff::CompareMode;
use assert_json_diff::Config;
use assert_json_diff::assert_json_matches_no_panic;
use serde_json::Number;
use serde_json::Value;

use crate::error::AssertionFailure;

/// Reads and parses a JSON fixture.
pub fn load(path: &Path) -> Result<Value, AssertionFailure> {
    let contents = std::fs::read_to_string(path).map_err(|e| AssertionFailure::FixtureUnreadable {
        fixture: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    serde_json::from_str(&contents).map_err(|e| AssertionFailure::FixtureUnreadable {
        fixture: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Resolves a fixture reference against `root` unless it is already absolute.
pub fn resolve(root: Option<&Path>, fixture: &Path) -> PathBuf {
    match root {
        Some(root) if fixture.is_relative() => root.join(fixture),
        _ => fixture.to_path_buf(),
    }
}

/// Structural equality over JSON trees.
///
/// Object keys are compared as sets, arrays element by element, numbers by
/// numeric value so `6` and `6.0` are equal.
pub fn json_eq(a: &Value, b: &Value) -> bool {
    compare(a, b).is_ok()
}

/// Compares `actual` (lhs) against `expected` (rhs) and describes every
/// location where they disagree.
pub fn compare(actual: &Value, expected: &Value) -> Result<(), String> {
    assert_json_matches_no_panic(
        &integral_numbers(actual),
        &integral_numbers(expected),
        Config::new(CompareMode::Strict),
    )
}

/// Rewrites floats with no fractional part as integers, so the strict
/// comparison sees `6.0` as `6` while large integers keep full precision.
fn integral_numbers(value: &Value) -> Value {
    match value {
        Value::Number(n) => Value::Number(as_integer(n).unwrap_or_else(|| n.clone())),
        Value::Array(items) => Value::Array(items.iter().map(integral_numbers).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), integral_numbers(value)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn as_integer(n: &Number) -> Option<Number> {
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;
    const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

    let float = n.as_f64().filter(|_| n.is_f64())?;
    if float.fract() != 0.0 {
        return None;
    }

    if (-TWO_POW_63..TWO_POW_63).contains(&float) {
        Some(Number::from(float as i64))
    } else if (0.0..TWO_POW_64).contains(&float) {
        Some(Number::from(float as u64))
    } else {
        None
    }
}

#[cfg(test)]
mod test {
    use std::io::Write;
    use std::path::Path;

    use serde_json::json;

    use super::compare;
    use super::json_eq;
    use super::load;
    use super::resolve;
    use crate::error::AssertionFailure;

    #[test]
    fn equality_ignores_key_order() {
        let a: serde_json::Value = serde_json::from_str(r#"{"a": 1, "b": {"c": [1, 2]}}"#).unwrap();
        let b: serde_json::Value = serde_json::from_str(r#"{"b": {"c": [1, 2]}, "a": 1}"#).unwrap();

        assert!(json_eq(&a, &b));
        assert_eq!(compare(&a, &b), Ok(()));
    }

    #[test]
    fn equality_respects_array_order() {
        let actual = json!({"data": [2, 1]});
        let expected = json!({"data": [1, 2]});

        assert!(!json_eq(&actual, &expected));
        let difference = compare(&actual, &expected).unwrap_err();
        assert!(difference.contains(".data[0]"), "{difference}");
    }

    #[test]
    fn numbers_compare_by_value() {
        assert!(json_eq(&json!(6), &json!(6.0)));
        assert!(json_eq(&json!(-1), &json!(-1.0)));
        assert!(json_eq(&json!(1.5), &json!(1.5)));
        assert!(!json_eq(&json!(6), &json!("6")));
        assert!(!json_eq(&json!(6), &json!(6.5)));
    }

    #[test]
    fn large_integers_keep_precision() {
        assert!(!json_eq(&json!(9_007_199_254_740_993_u64), &json!(9_007_199_254_740_992.0)));
        assert!(!json_eq(&json!(9_007_199_254_740_993_i64), &json!(9_007_199_254_740_992_i64)));
        assert!(json_eq(&json!(9_007_199_254_740_992_u64), &json!(9_007_199_254_740_992.0)));
        assert!(json_eq(&json!(u64::MAX), &json!(u64::MAX)));
    }

    #[test]
    fn reports_missing_and_extra_keys() {
        let expected = json!({"data": {"id": 2, "name": "fuchsia rose"}});

        let actual = json!({"data": {"id": 2}});
        let difference = compare(&actual, &expected).unwrap_err();
        assert!(difference.contains(".data.name"), "{difference}");

        let actual = json!({"data": {"id": 2, "name": "fuchsia rose"}, "support": {}});
        let difference = compare(&actual, &expected).unwrap_err();
        assert!(difference.contains(".support"), "{difference}");
    }

    #[test]
    fn keys_with_spaces_are_named_in_full() {
        let actual = json!({"first name": "Emma"});
        let expected = json!({"first name": "Eve"});

        let difference = compare(&actual, &expected).unwrap_err();
        assert!(difference.contains("first name"), "{difference}");
        assert!(difference.contains("Emma") && difference.contains("Eve"), "{difference}");
    }

    #[test]
    fn fixture_is_reflexive() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"page": 1, "data": [{{"id": 1, "first_name": "George"}}], "total": 12}}"#
        )
        .unwrap();

        let expected = load(file.path()).unwrap();
        let again = load(file.path()).unwrap();

        assert!(json_eq(&expected, &again));
        assert_eq!(compare(&again, &expected), Ok(()));
    }

    #[test]
    fn unreadable_fixtures_are_reported() {
        let missing = Path::new("does/not/exist.json");
        assert!(matches!(
            load(missing),
            Err(AssertionFailure::FixtureUnreadable { .. })
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        assert!(matches!(
            load(file.path()),
            Err(AssertionFailure::FixtureUnreadable { .. })
        ));
    }

    #[test]
    fn relative_fixtures_resolve_against_root() {
        let root = Path::new("/srv/fixtures");

        assert_eq!(
            resolve(Some(root), Path::new("user.json")),
            Path::new("/srv/fixtures/user.json")
        );
        assert_eq!(
            resolve(Some(root), Path::new("/tmp/users.json")),
            Path::new("/tmp/users.json")
        );
        assert_eq!(resolve(None, Path::new("user.json")), Path::new("user.json"));
    }
}
