//! Year-section grouping.
//!
//! [`grouping_key`] is the only place an entry's section is derived. The
//! section list, the per-section filter and the cascade delete all go
//! through it.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::Serialize;

use crate::constants::UNGROUPED_LABEL;

/// Anything that can be placed in a year section.
pub trait Groupable {
    fn year_section(&self) -> Option<&str>;

    fn year(&self) -> Option<i32>;

    fn grouping_key(&self) -> String {
        grouping_key(self.year_section(), self.year())
    }
}

/// Resolves the section label for an entry.
///
/// The explicit section wins, then the numeric year, then [`UNGROUPED_LABEL`].
/// Blank sections count as absent.
///
/// ```
/// use tsundoku::domain::grouping_key;
///
/// assert_eq!(grouping_key(Some("2025"), Some(2019)), "2025");
/// assert_eq!(grouping_key(None, Some(2019)), "2019");
/// assert_eq!(grouping_key(Some("  "), None), "Ungrouped");
/// ```
#[must_use]
pub fn grouping_key(year_section: Option<&str>, year: Option<i32>) -> String {
    if let Some(section) = year_section.map(str::trim).filter(|s| !s.is_empty()) {
        return section.to_string();
    }

    year.map_or_else(|| UNGROUPED_LABEL.to_string(), |y| y.to_string())
}

/// Ordering for section labels: latest-looking first, `Ungrouped` last.
fn compare_labels(a: &str, b: &str) -> Ordering {
    match (a == UNGROUPED_LABEL, b == UNGROUPED_LABEL) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.cmp(a),
    }
}

/// Enumerates the visible sections: every declared label plus the grouping
/// key of every entry, deduplicated and sorted.
pub fn section_labels<'a, E, I>(declared: &[String], entries: I) -> Vec<String>
where
    E: Groupable + 'a,
    I: IntoIterator<Item = &'a E>,
{
    let mut labels: BTreeSet<String> = declared
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();

    labels.extend(entries.into_iter().map(E::grouping_key));

    let mut labels: Vec<String> = labels.into_iter().collect();
    labels.sort_by(|a, b| compare_labels(a, b));
    labels
}

#[derive(Debug, Clone, Serialize)]
pub struct Section<E> {
    pub label: String,
    pub entries: Vec<E>,
}

/// Buckets entries under the given labels, preserving label order and the
/// entries' own order. Entries whose key is not among `labels` are dropped.
#[must_use]
pub fn group_into_sections<E>(labels: Vec<String>, entries: &[E]) -> Vec<Section<E>>
where
    E: Groupable + Clone,
{
    labels
        .into_iter()
        .map(|label| {
            let members = entries
                .iter()
                .filter(|e| e.grouping_key() == label)
                .cloned()
                .collect();
            Section {
                label,
                entries: members,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    struct Item {
        section: Option<String>,
        year: Option<i32>,
    }

    impl Item {
        fn new(section: Option<&str>, year: Option<i32>) -> Self {
            Self {
                section: section.map(str::to_string),
                year,
            }
        }
    }

    impl Groupable for Item {
        fn year_section(&self) -> Option<&str> {
            self.section.as_deref()
        }

        fn year(&self) -> Option<i32> {
            self.year
        }
    }

    #[test]
    fn key_prefers_section_over_year() {
        assert_eq!(grouping_key(Some("Rewatch"), Some(2011)), "Rewatch");
        assert_eq!(grouping_key(None, Some(2011)), "2011");
        assert_eq!(grouping_key(None, None), UNGROUPED_LABEL);
    }

    #[test]
    fn key_trims_section() {
        assert_eq!(grouping_key(Some(" 2024 "), None), "2024");
        assert_eq!(grouping_key(Some(""), Some(1998)), "1998");
    }

    #[test]
    fn key_is_never_empty() {
        let cases = [
            (None, None),
            (Some(""), None),
            (Some("\t"), None),
            (None, Some(0)),
            (Some("x"), None),
        ];
        for (section, year) in cases {
            assert!(!grouping_key(section, year).is_empty());
        }
    }

    #[test]
    fn labels_union_declared_and_entry_keys() {
        let declared = vec!["2025".to_string(), "2023".to_string()];
        let entries = vec![
            Item::new(Some("2024"), None),
            Item::new(None, Some(2023)),
            Item::new(None, None),
        ];

        let labels = section_labels(&declared, &entries);
        assert_eq!(labels, vec!["2025", "2024", "2023", UNGROUPED_LABEL]);
    }

    #[test]
    fn ungrouped_sorts_last_even_when_declared() {
        let declared = vec![UNGROUPED_LABEL.to_string(), "Zzz".to_string()];
        let labels = section_labels::<Item, _>(&declared, &[]);
        assert_eq!(labels, vec!["Zzz", UNGROUPED_LABEL]);
    }

    #[test]
    fn sections_filter_with_the_same_key() {
        let entries = vec![
            Item::new(Some("2024"), Some(2019)),
            Item::new(None, Some(2024)),
            Item::new(None, Some(2019)),
        ];
        let labels = section_labels(&[], &entries);
        let sections = group_into_sections(labels, &entries);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].label, "2024");
        assert_eq!(sections[0].entries.len(), 2);
        assert_eq!(sections[1].label, "2019");
        assert_eq!(sections[1].entries.len(), 1);
    }

    #[test]
    fn declared_empty_section_is_listed() {
        let declared = vec!["2026".to_string()];
        let entries: Vec<Item> = Vec::new();
        let sections = group_into_sections(section_labels(&declared, &entries), &entries);
        assert_eq!(sections.len(), 1);
        assert!(sections[0].entries.is_empty());
    }
}
