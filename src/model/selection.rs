//! Default / primary selection and name-keyed insertion.

use std::collections::{BTreeMap, HashMap};

use super::{DuplicatePolicy, MetaModelError};

/// Pick the selected name from `(name, explicitly_flagged)` pairs in document order.
///
/// The last explicitly flagged entry wins; with none flagged, the first entry does.
pub(crate) fn select<'a>(entries: impl IntoIterator<Item = (&'a str, bool)>) -> Option<&'a str> {
    let mut first = None;
    let mut flagged = None;
    for (name, is_flagged) in entries {
        first.get_or_insert(name);
        if is_flagged {
            flagged = Some(name);
        }
    }
    flagged.or(first)
}

/// Resolve duplicate names in `items` under the duplicate policy.
///
/// Survivors keep document order; a replacing entity takes the position of its
/// own definition, not the one it replaces.
pub(crate) fn dedup_named<T>(
    items: Vec<T>,
    entity: &'static str,
    name_of: impl Fn(&T) -> &str,
    policy: DuplicatePolicy,
) -> Result<Vec<T>, MetaModelError> {
    let mut slots: Vec<Option<T>> = Vec::with_capacity(items.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items {
        let name = name_of(&item).to_string();
        if let Some(&earlier) = index.get(&name) {
            match policy {
                DuplicatePolicy::Replace => {
                    tracing::warn!(
                        "Duplicate {} name '{}', later definition replaces earlier",
                        entity,
                        name
                    );
                    slots[earlier] = None;
                }
                DuplicatePolicy::Reject => {
                    return Err(MetaModelError::DuplicateName { entity, name });
                }
            }
        }
        index.insert(name, slots.len());
        slots.push(Some(item));
    }

    Ok(slots.into_iter().flatten().collect())
}

/// Key surviving entities by name.
pub(crate) fn by_name<T>(items: Vec<T>, name_of: impl Fn(&T) -> &str) -> BTreeMap<String, T> {
    items
        .into_iter()
        .map(|item| (name_of(&item).to_string(), item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_wins_without_flags() {
        assert_eq!(select([("a", false), ("b", false), ("c", false)]), Some("a"));
    }

    #[test]
    fn test_flag_wins() {
        assert_eq!(select([("a", false), ("b", false), ("c", true)]), Some("c"));
    }

    #[test]
    fn test_last_flag_wins() {
        assert_eq!(select([("a", true), ("b", false), ("c", true)]), Some("c"));
    }

    #[test]
    fn test_empty() {
        assert_eq!(select(std::iter::empty::<(&str, bool)>()), None);
    }

    #[test]
    fn test_dedup_replace_keeps_later_in_its_position() {
        let items = vec![("a", 1), ("b", 2), ("a", 3), ("c", 4)];
        let kept = dedup_named(items, "x", |i| i.0, DuplicatePolicy::Replace).unwrap();
        assert_eq!(kept, vec![("b", 2), ("a", 3), ("c", 4)]);
    }

    #[test]
    fn test_dedup_reject() {
        let items = vec![("a", 1), ("a", 2)];
        let err = dedup_named(items, "x", |i| i.0, DuplicatePolicy::Reject).unwrap_err();
        assert_eq!(err.to_string(), "Duplicate x name 'a'");
    }

    #[test]
    fn test_selection_after_replacement() {
        // a and b flagged, then b redefined without the flag
        let items = vec![("a", true), ("b", true), ("b", false)];
        let kept = dedup_named(items, "x", |i| i.0, DuplicatePolicy::Replace).unwrap();
        assert_eq!(select(kept.iter().copied()), Some("a"));
    }
}
