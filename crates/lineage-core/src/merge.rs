//! # Effective-Settings Merger
//!
//! Folds a root-to-leaf chain into one value per setting.
//!
//! A value only replaces the running result if it is *meaningful*: not null,
//! not a blank or placeholder string, not an empty or all-blank list. Numbers
//! and booleans always count. A child that leaves a key blank therefore never
//! hides a real value declared further up.
//!
//! Script settings (`*gcode*`, `filament_notes`) are flagged on every row so
//! renderers can show them as a presence marker instead of the full text.

use crate::primitives::{PLACEHOLDER, SCRIPT_KEYS, SCRIPT_KEY_MARKERS};
use crate::types::{Profile, ProfileId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// POLICY
// =============================================================================

/// What counts as a value and which settings are free-form scripts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingPolicy {
    /// Substrings marking a script setting, matched case-insensitively.
    pub script_key_markers: Vec<String>,
    /// Exact script setting names, matched case-insensitively.
    pub script_keys: Vec<String>,
    /// String that stands for "no value".
    pub placeholder: String,
}

impl Default for SettingPolicy {
    fn default() -> Self {
        Self {
            script_key_markers: SCRIPT_KEY_MARKERS.iter().map(|s| (*s).to_string()).collect(),
            script_keys: SCRIPT_KEYS.iter().map(|s| (*s).to_string()).collect(),
            placeholder: PLACEHOLDER.to_string(),
        }
    }
}

impl SettingPolicy {
    /// Whether `key` is a free-form script or notes setting.
    #[must_use]
    pub fn is_script_key(&self, key: &str) -> bool {
        let key = key.to_ascii_lowercase();
        self.script_key_markers
            .iter()
            .any(|marker| !marker.is_empty() && key.contains(&marker.to_ascii_lowercase()))
            || self
                .script_keys
                .iter()
                .any(|exact| exact.eq_ignore_ascii_case(&key))
    }

    /// Whether `value` may win a merge.
    #[must_use]
    pub fn is_meaningful(&self, value: &Value) -> bool {
        match value {
            Value::Null => false,
            Value::Bool(_) | Value::Number(_) => true,
            Value::String(s) => {
                let trimmed = s.trim();
                !trimmed.is_empty() && trimmed != self.placeholder
            }
            Value::Array(items) => items.iter().any(|item| self.is_meaningful(item)),
            Value::Object(map) => !map.is_empty(),
        }
    }

    /// Presence flag for a possibly absent value.
    #[must_use]
    pub fn presence(&self, value: Option<&Value>) -> Presence {
        match value {
            Some(v) if self.is_meaningful(v) => Presence::Set,
            _ => Presence::NotSet,
        }
    }
}

/// Declared-and-non-blank, or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Set,
    NotSet,
}

// =============================================================================
// EFFECTIVE VALUES
// =============================================================================

/// Result of merging one setting across a chain.
///
/// `Unset` means no link declared a meaningful value, which is different from
/// a link declaring an empty one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "value")]
pub enum EffectiveValue {
    Set(Value),
    Unset,
}

impl EffectiveValue {
    /// The winning value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Set(v) => Some(v),
            Self::Unset => None,
        }
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }
}

/// Setting key -> effective value, sorted by key.
pub type EffectiveSettings = BTreeMap<String, EffectiveValue>;

/// Identifies one column of a multi-profile table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnHeader {
    pub id: ProfileId,
    pub store_key: String,
    pub display_name: String,
    pub origin_location: String,
}

impl From<&Profile> for ColumnHeader {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            store_key: profile.store_key.clone(),
            display_name: profile.display_name.clone(),
            origin_location: profile.origin_location.clone(),
        }
    }
}

/// "Who declared what" along one chain. Columns are root first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonTable {
    pub columns: Vec<ColumnHeader>,
    pub rows: Vec<ComparisonRow>,
}

/// One setting across the chain; `None` where a link does not declare it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub setting: String,
    pub script: bool,
    pub cells: Vec<Option<Value>>,
}

/// Effective settings of several profiles side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectiveMatrix {
    pub columns: Vec<ColumnHeader>,
    pub rows: Vec<EffectiveRow>,
}

/// One setting across several profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectiveRow {
    pub setting: String,
    pub script: bool,
    pub cells: Vec<EffectiveValue>,
}

// =============================================================================
// MERGER
// =============================================================================

/// Merges chains under a `SettingPolicy`.
#[derive(Debug, Clone, Copy)]
pub struct Merger<'p> {
    policy: &'p SettingPolicy,
}

impl<'p> Merger<'p> {
    #[must_use]
    pub fn new(policy: &'p SettingPolicy) -> Self {
        Self { policy }
    }

    /// Effective value of every key in `keys`, or of every key declared
    /// anywhere in the chain when `keys` is `None`.
    ///
    /// `root_first` must be ordered root to leaf.
    #[must_use]
    pub fn effective(
        &self,
        root_first: &[&Profile],
        keys: Option<&BTreeSet<String>>,
    ) -> EffectiveSettings {
        let declared;
        let keys = match keys {
            Some(keys) => keys,
            None => {
                declared = declared_keys(root_first.iter().copied());
                &declared
            }
        };

        keys.iter()
            .map(|key| (key.clone(), self.effective_value(root_first, key)))
            .collect()
    }

    /// Most specific meaningful value of one key.
    #[must_use]
    pub fn effective_value(&self, root_first: &[&Profile], key: &str) -> EffectiveValue {
        root_first
            .iter()
            .rev()
            .filter_map(|profile| profile.attribute(key))
            .find(|value| self.policy.is_meaningful(value))
            .map_or(EffectiveValue::Unset, |value| EffectiveValue::Set(value.clone()))
    }

    /// Raw declared values per chain position, without merging.
    ///
    /// Rows cover only keys declared by at least one link.
    #[must_use]
    pub fn comparison(&self, root_first: &[&Profile]) -> ComparisonTable {
        let rows = declared_keys(root_first.iter().copied())
            .into_iter()
            .map(|setting| ComparisonRow {
                script: self.policy.is_script_key(&setting),
                cells: root_first
                    .iter()
                    .map(|profile| profile.attribute(&setting).cloned())
                    .collect(),
                setting,
            })
            .collect();

        ComparisonTable {
            columns: root_first.iter().map(|p| ColumnHeader::from(*p)).collect(),
            rows,
        }
    }

    /// Effective settings for several profiles, one column each, over the
    /// sorted union of all keys declared along any of their chains.
    ///
    /// Each entry pairs the column's profile with its root-first chain.
    #[must_use]
    pub fn matrix(&self, columns: &[(&Profile, Vec<&Profile>)]) -> EffectiveMatrix {
        let keys = declared_keys(columns.iter().flat_map(|(_, chain)| chain.iter().copied()));
        let merged: Vec<EffectiveSettings> = columns
            .iter()
            .map(|(_, chain)| self.effective(chain, Some(&keys)))
            .collect();

        let rows = keys
            .into_iter()
            .map(|setting| EffectiveRow {
                script: self.policy.is_script_key(&setting),
                cells: merged
                    .iter()
                    .map(|settings| {
                        settings
                            .get(&setting)
                            .cloned()
                            .unwrap_or(EffectiveValue::Unset)
                    })
                    .collect(),
                setting,
            })
            .collect();

        EffectiveMatrix {
            columns: columns.iter().map(|(head, _)| ColumnHeader::from(*head)).collect(),
            rows,
        }
    }
}

fn declared_keys<'a>(profiles: impl Iterator<Item = &'a Profile>) -> BTreeSet<String> {
    profiles
        .flat_map(|profile| profile.attributes.keys().cloned())
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use serde_json::json;

    fn profile(id: u32, name: &str, attrs: Value) -> Profile {
        let attributes = match attrs {
            Value::Object(map) => map.into_iter().collect(),
            _ => BTreeMap::new(),
        };
        Profile {
            id: ProfileId(id),
            store_key: name.to_string(),
            display_name: name.to_string(),
            parent_name: None,
            origin_location: format!("x/{name}.json"),
            is_system_provided: false,
            category: Category::Filament,
            attributes,
        }
    }

    #[test]
    fn meaningful_values() {
        let policy = SettingPolicy::default();
        assert!(!policy.is_meaningful(&Value::Null));
        assert!(!policy.is_meaningful(&json!("")));
        assert!(!policy.is_meaningful(&json!("  ")));
        assert!(!policy.is_meaningful(&json!("-")));
        assert!(!policy.is_meaningful(&json!([])));
        assert!(!policy.is_meaningful(&json!(["", "-", null])));
        assert!(!policy.is_meaningful(&json!({})));
        assert!(policy.is_meaningful(&json!(0)));
        assert!(policy.is_meaningful(&json!(false)));
        assert!(policy.is_meaningful(&json!("0")));
        assert!(policy.is_meaningful(&json!(["", "210"])));
        assert!(policy.is_meaningful(&json!({"a": 1})));
    }

    #[test]
    fn script_keys_match_markers_and_names() {
        let policy = SettingPolicy::default();
        assert!(policy.is_script_key("machine_start_gcode"));
        assert!(policy.is_script_key("Filament_Start_GCode"));
        assert!(policy.is_script_key("filament_notes"));
        assert!(!policy.is_script_key("filament_notes_extra"));
        assert!(!policy.is_script_key("nozzle_temperature"));
    }

    #[test]
    fn presence_follows_meaning() {
        let policy = SettingPolicy::default();
        assert_eq!(policy.presence(Some(&json!("G28"))), Presence::Set);
        assert_eq!(policy.presence(Some(&json!(""))), Presence::NotSet);
        assert_eq!(policy.presence(None), Presence::NotSet);
    }

    #[test]
    fn blank_override_is_transparent() {
        let base = profile(0, "Base", json!({"nozzle_temperature": 200}));
        let mid = profile(1, "Mid", json!({"nozzle_temperature": ""}));
        let leaf = profile(2, "Leaf", json!({}));
        let policy = SettingPolicy::default();

        let settings = Merger::new(&policy).effective(&[&base, &mid, &leaf], None);
        assert_eq!(
            settings.get("nozzle_temperature"),
            Some(&EffectiveValue::Set(json!(200)))
        );
    }

    #[test]
    fn most_specific_wins() {
        let base = profile(0, "Base", json!({"speed": 50, "fan": [1]}));
        let leaf = profile(1, "Leaf", json!({"speed": 80}));
        let policy = SettingPolicy::default();

        let settings = Merger::new(&policy).effective(&[&base, &leaf], None);
        assert_eq!(settings.get("speed"), Some(&EffectiveValue::Set(json!(80))));
        assert!(settings.get("speed").is_some_and(EffectiveValue::is_set));
        assert_eq!(settings.get("fan"), Some(&EffectiveValue::Set(json!([1]))));
    }

    #[test]
    fn nothing_meaningful_is_unset() {
        let only = profile(0, "A", json!({"notes": "", "list": ["-"]}));
        let policy = SettingPolicy::default();
        let keys: BTreeSet<String> = ["notes", "list", "never"]
            .into_iter()
            .map(str::to_string)
            .collect();

        let settings = Merger::new(&policy).effective(&[&only], Some(&keys));
        assert_eq!(settings.len(), 3);
        assert!(settings.values().all(|v| *v == EffectiveValue::Unset));
        assert!(settings.values().all(|v| !v.is_set() && v.value().is_none()));
    }

    #[test]
    fn comparison_keeps_raw_values() {
        let base = profile(0, "Base", json!({"a": 1, "start_gcode": "G28"}));
        let leaf = profile(1, "Leaf", json!({"a": "", "b": 2}));
        let policy = SettingPolicy::default();

        let table = Merger::new(&policy).comparison(&[&base, &leaf]);
        let names: Vec<_> = table.columns.iter().map(|c| c.display_name.as_str()).collect();
        assert_eq!(names, vec!["Base", "Leaf"]);

        let settings: Vec<_> = table.rows.iter().map(|r| r.setting.as_str()).collect();
        assert_eq!(settings, vec!["a", "b", "start_gcode"]);
        assert_eq!(table.rows[0].cells, vec![Some(json!(1)), Some(json!(""))]);
        assert_eq!(table.rows[1].cells, vec![None, Some(json!(2))]);
        assert!(table.rows[2].script);
    }

    #[test]
    fn matrix_uses_union_of_keys() {
        let a = profile(0, "A", json!({"x": 1}));
        let b = profile(1, "B", json!({"y": 2}));
        let policy = SettingPolicy::default();

        let matrix = Merger::new(&policy).matrix(&[(&a, vec![&a]), (&b, vec![&b])]);
        assert_eq!(matrix.columns.len(), 2);
        assert_eq!(matrix.rows.len(), 2);
        assert_eq!(
            matrix.rows[0].cells,
            vec![EffectiveValue::Set(json!(1)), EffectiveValue::Unset]
        );
        assert_eq!(
            matrix.rows[1].cells,
            vec![EffectiveValue::Unset, EffectiveValue::Set(json!(2))]
        );
    }
}
