//! # Ingestor Module
//!
//! Record validation and ingestion protocol for the profile store.
//!
//! - Extract the identity fields (`name`, `inherits`, `from`, `type`)
//! - Decide the profile category
//! - Reject documents without a usable name
//! - Keep every other key as an attribute, untouched

use crate::primitives::{CATEGORY_SEGMENTS, STRUCTURAL_KEYS, SYSTEM_ORIGIN};
use crate::resolver::directory_segments;
use crate::store::{ProfileDraft, ProfileStore};
use crate::types::{Category, LineageError, ProfileId, ProfileRecord};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Outcome of one ingestion pass.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Ids of inserted profiles, in insertion order.
    pub inserted: Vec<ProfileId>,
    /// Records that could not be converted, with their origin.
    pub rejected: Vec<(String, LineageError)>,
    /// Valid records skipped by the category filter.
    pub filtered: usize,
}

/// The Ingestor turns parsed records into stored profiles.
///
/// The Ingestor:
/// - Accepts already-parsed documents from the loader
/// - Never touches attribute values
/// - Inserts in exactly the order it is given
pub struct Ingestor;

impl Ingestor {
    /// Convert a single record into a draft ready for insertion.
    ///
    /// Returns `LineageError::MissingName` if `name` is absent, not a string,
    /// or blank.
    pub fn profile_from_record(record: &ProfileRecord) -> Result<ProfileDraft, LineageError> {
        let document = &record.document;

        let display_name = match document.get("name") {
            Some(Value::String(name)) if !name.trim().is_empty() => name.clone(),
            _ => {
                return Err(LineageError::MissingName {
                    origin: record.origin.clone(),
                });
            }
        };

        // Non-string or blank `inherits` means no parent.
        let parent_name = match document.get("inherits") {
            Some(Value::String(parent)) if !parent.trim().is_empty() => Some(parent.clone()),
            _ => None,
        };

        let is_system_provided = document
            .get("from")
            .and_then(Value::as_str)
            .is_some_and(|from| from.trim().eq_ignore_ascii_case(SYSTEM_ORIGIN));

        let declared_type = document.get("type").and_then(Value::as_str);
        let category = infer_category(declared_type, &record.origin, record.category_hint);

        let attributes: BTreeMap<String, Value> = document
            .iter()
            .filter(|(key, _)| !STRUCTURAL_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(ProfileDraft {
            display_name,
            parent_name,
            origin_location: record.origin.clone(),
            is_system_provided,
            category,
            attributes,
        })
    }

    /// Ingest records in order.
    ///
    /// With `categories`, profiles of other categories are counted in
    /// `IngestReport::filtered` and not inserted. Conversion failures never
    /// abort the pass.
    pub fn ingest<I>(
        store: &mut ProfileStore,
        records: I,
        categories: Option<&BTreeSet<Category>>,
    ) -> IngestReport
    where
        I: IntoIterator<Item = ProfileRecord>,
    {
        let mut report = IngestReport::default();

        for record in records {
            match Self::profile_from_record(&record) {
                Ok(draft) => {
                    if categories.is_some_and(|wanted| !wanted.contains(&draft.category)) {
                        report.filtered += 1;
                        continue;
                    }
                    report.inserted.push(store.put(draft));
                }
                Err(err) => report.rejected.push((record.origin, err)),
            }
        }

        report
    }
}

/// Decide the category of a profile.
///
/// An explicit `machine` or `process` type wins. Otherwise (type absent,
/// `filament`, or something like `machine_model`) the first category-named
/// directory in the origin decides, checked as process, machine, filament.
/// Then the hint, then filament.
#[must_use]
pub fn infer_category(declared_type: Option<&str>, origin: &str, hint: Option<Category>) -> Category {
    match declared_type.and_then(Category::parse) {
        Some(explicit @ (Category::Machine | Category::Process)) => return explicit,
        Some(Category::Filament) | None => {}
    }

    let dirs = directory_segments(origin);
    CATEGORY_SEGMENTS
        .iter()
        .find(|segment| dirs.contains(segment))
        .and_then(|segment| Category::parse(segment))
        .or(hint)
        .unwrap_or(Category::Filament)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value, origin: &str) -> ProfileRecord {
        ProfileRecord::from_value(value, origin).expect("object")
    }

    #[test]
    fn extracts_identity_and_attributes() {
        let rec = record(
            json!({
                "name": "PLA Black",
                "inherits": "PLA",
                "from": "System",
                "type": "filament",
                "nozzle_temperature": ["210"],
            }),
            "system/Vendor/filament/PLA_Black.json",
        );
        let draft = Ingestor::profile_from_record(&rec).expect("valid");

        assert_eq!(draft.display_name, "PLA Black");
        assert_eq!(draft.parent_name.as_deref(), Some("PLA"));
        assert!(draft.is_system_provided);
        assert_eq!(draft.category, Category::Filament);
        assert_eq!(draft.attributes.len(), 1);
        assert!(draft.attributes.contains_key("nozzle_temperature"));
    }

    #[test]
    fn missing_or_blank_name_is_rejected() {
        for doc in [json!({}), json!({"name": "  "}), json!({"name": 3})] {
            let rec = record(doc, "x.json");
            assert!(matches!(
                Ingestor::profile_from_record(&rec),
                Err(LineageError::MissingName { .. })
            ));
        }
    }

    #[test]
    fn blank_inherits_means_root() {
        let rec = record(json!({"name": "A", "inherits": ""}), "a.json");
        let draft = Ingestor::profile_from_record(&rec).expect("valid");
        assert!(draft.parent_name.is_none());
        assert!(!draft.is_system_provided);
    }

    #[test]
    fn category_explicit_type_wins() {
        assert_eq!(
            infer_category(Some("process"), "x/filament/a.json", None),
            Category::Process
        );
        assert_eq!(
            infer_category(Some("Machine"), "x/a.json", None),
            Category::Machine
        );
    }

    #[test]
    fn category_falls_back_to_directory() {
        assert_eq!(
            infer_category(Some("filament"), "v/process/a.json", None),
            Category::Process
        );
        assert_eq!(
            infer_category(Some("machine_model"), "v/machine/a.json", None),
            Category::Machine
        );
        assert_eq!(
            infer_category(None, "v/filament/machine/a.json", None),
            Category::Machine
        );
        // File names do not count as directories.
        assert_eq!(infer_category(None, "v/process.json", None), Category::Filament);
    }

    #[test]
    fn category_uses_hint_last() {
        assert_eq!(
            infer_category(None, "user/a.json", Some(Category::Process)),
            Category::Process
        );
        assert_eq!(infer_category(None, "user/a.json", None), Category::Filament);
    }

    #[test]
    fn record_hint_reaches_the_store() {
        let mut store = ProfileStore::new();
        let records = vec![
            record(json!({"name": "Tuned"}), "user/1/Tuned.json")
                .with_category_hint(Category::Process),
            // The directory outranks the hint.
            record(json!({"name": "Base"}), "v/machine/Base.json")
                .with_category_hint(Category::Process),
        ];

        let report = Ingestor::ingest(&mut store, records, None);

        assert_eq!(report.inserted.len(), 2);
        assert_eq!(
            store.get_by_key("Tuned").map(|p| p.category),
            Some(Category::Process)
        );
        assert_eq!(
            store.get_by_key("Base").map(|p| p.category),
            Some(Category::Machine)
        );
    }

    #[test]
    fn ingest_collects_failures_and_filters() {
        let mut store = ProfileStore::new();
        let records = vec![
            record(json!({"name": "PLA"}), "v/filament/PLA.json"),
            record(json!({"inherits": "PLA"}), "v/filament/broken.json"),
            record(json!({"name": "0.20mm"}), "v/process/020.json"),
        ];
        let wanted: BTreeSet<Category> = [Category::Filament].into_iter().collect();

        let report = Ingestor::ingest(&mut store, records, Some(&wanted));

        assert_eq!(report.inserted.len(), 1);
        assert_eq!(report.filtered, 1);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].0, "v/filament/broken.json");
        assert_eq!(store.len(), 1);
    }
}
