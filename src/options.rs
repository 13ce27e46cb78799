//! Option mappings and the default-beneath-caller merge

use serde_json::{Map, Value};

/// Rendering-library tunables (timeout, layout, theme, ...).
pub type Options = Map<String, Value>;

/// Merge `overrides` over `defaults`.
///
/// Nested objects merge key by key; any other value in `overrides` replaces
/// the default outright, arrays included.
///
/// # Examples
///
/// ```
/// use reinhardt_noty::options::{Options, merge_options};
/// use serde_json::json;
///
/// let defaults: Options = serde_json::from_value(json!({"timeout": 5000, "layout": "topRight"})).unwrap();
/// let caller: Options = serde_json::from_value(json!({"timeout": 3000})).unwrap();
///
/// let merged = merge_options(&defaults, &caller);
/// assert_eq!(merged["timeout"], 3000);
/// assert_eq!(merged["layout"], "topRight");
/// ```
pub fn merge_options(defaults: &Options, overrides: &Options) -> Options {
	let mut merged = defaults.clone();
	for (key, value) in overrides {
		let next = match (merged.get(key), value) {
			(Some(Value::Object(base)), Value::Object(over)) => {
				Value::Object(merge_options(base, over))
			}
			_ => value.clone(),
		};
		merged.insert(key.clone(), next);
	}
	merged
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn options(value: Value) -> Options {
		match value {
			Value::Object(map) => map,
			_ => panic!("expected object"),
		}
	}

	#[rstest]
	fn test_caller_wins_on_conflict() {
		let merged = merge_options(
			&options(json!({"timeout": 5000, "theme": "relax"})),
			&options(json!({"theme": "mint"})),
		);
		assert_eq!(merged, options(json!({"timeout": 5000, "theme": "mint"})));
	}

	#[rstest]
	fn test_nested_objects_merge() {
		let merged = merge_options(
			&options(json!({"animation": {"open": "fadeIn", "close": "fadeOut"}})),
			&options(json!({"animation": {"close": null}})),
		);
		assert_eq!(merged["animation"], json!({"open": "fadeIn", "close": null}));
	}

	#[rstest]
	fn test_arrays_replace() {
		let merged = merge_options(
			&options(json!({"buttons": ["ok"]})),
			&options(json!({"buttons": ["yes", "no"]})),
		);
		assert_eq!(merged["buttons"], json!(["yes", "no"]));
	}

	#[rstest]
	fn test_object_replaced_by_scalar() {
		let merged = merge_options(
			&options(json!({"animation": {"open": "fadeIn"}})),
			&options(json!({"animation": false})),
		);
		assert_eq!(merged["animation"], json!(false));
	}

	#[rstest]
	fn test_inputs_untouched_and_order_kept() {
		let defaults = options(json!({"a": 1, "b": 2}));
		let overrides = options(json!({"c": 3, "a": 9}));
		let merged = merge_options(&defaults, &overrides);

		assert_eq!(defaults, options(json!({"a": 1, "b": 2})));
		let keys: Vec<&String> = merged.keys().collect();
		assert_eq!(keys, vec!["a", "b", "c"]);
	}
}
