//! Property tests for the flash drain and the option merge

use proptest::prelude::*;
use reinhardt_noty::drain::drain;
use reinhardt_noty::flash::{FlashStorage, FlashTypes, FlashValue, MemoryFlashStorage};
use reinhardt_noty::layer::{AlertLayer, LayerOptions};
use reinhardt_noty::options::{Options, merge_options};
use serde_json::Value;
use std::collections::BTreeMap;

const KEYS: &[&str] = &[
	"alert", "info", "success", "error", "warning", "custom", "notice", "Error",
];

fn flash_value() -> impl Strategy<Value = FlashValue> {
	let message = "[a-zA-Z0-9 |]{0,12}";
	prop_oneof![
		Just(FlashValue::Empty),
		message.prop_map(FlashValue::One),
		prop::collection::vec(message, 0..4).prop_map(FlashValue::Many),
	]
}

fn entries() -> impl Strategy<Value = Vec<(String, FlashValue)>> {
	prop::collection::btree_map(prop::sample::select(KEYS), flash_value(), 0..KEYS.len())
		.prop_map(|map| map.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
}

fn scalar_options() -> impl Strategy<Value = Options> {
	prop::collection::btree_map("[a-d]", any::<i32>(), 0..4).prop_map(|map| {
		map.into_iter()
			.map(|(k, v)| (k, Value::from(v)))
			.collect::<Options>()
	})
}

proptest! {
	#[test]
	fn drain_removes_exactly_recognized_entries(entries in entries()) {
		let recognized = FlashTypes::default();
		let storage = MemoryFlashStorage::with_entries(entries.clone());
		let mut layer = AlertLayer::new(LayerOptions::default());

		drain(&storage, &recognized, &mut layer, &Options::new()).unwrap();

		let expected: Vec<(String, FlashValue)> = entries
			.into_iter()
			.filter(|(key, _)| !recognized.contains(key))
			.collect();
		prop_assert_eq!(storage.all().unwrap(), expected);
	}

	#[test]
	fn drain_renders_one_notification_per_message(entries in entries()) {
		let recognized = FlashTypes::default();
		let expected: usize = entries
			.iter()
			.filter(|(key, _)| recognized.contains(key))
			.map(|(_, value)| value.messages().len())
			.sum();
		let storage = MemoryFlashStorage::with_entries(entries);
		let mut layer = AlertLayer::new(LayerOptions::default());

		let notifications = drain(&storage, &recognized, &mut layer, &Options::new()).unwrap();

		prop_assert_eq!(notifications.len(), expected);
	}

	#[test]
	fn second_drain_is_empty_and_mutates_nothing(entries in entries()) {
		let recognized = FlashTypes::default();
		let storage = MemoryFlashStorage::with_entries(entries);
		let mut layer = AlertLayer::new(LayerOptions::default());
		drain(&storage, &recognized, &mut layer, &Options::new()).unwrap();
		let before = storage.all().unwrap();

		let second = drain(&storage, &recognized, &mut layer, &Options::new()).unwrap();

		prop_assert!(second.is_empty());
		prop_assert_eq!(storage.all().unwrap(), before);
	}

	#[test]
	fn caller_options_win_over_defaults(defaults in scalar_options(), caller in scalar_options()) {
		let merged = merge_options(&defaults, &caller);

		let keys: BTreeMap<&String, ()> = defaults.keys().chain(caller.keys()).map(|k| (k, ())).collect();
		prop_assert_eq!(merged.len(), keys.len());
		for (key, value) in &merged {
			let expected = caller.get(key).or_else(|| defaults.get(key));
			prop_assert_eq!(Some(value), expected);
		}
	}
}
