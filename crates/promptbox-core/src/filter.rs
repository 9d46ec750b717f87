use crate::record::PromptRecord;

/// Records whose name or any tag contains `query`, case-insensitively,
/// in their original order. An empty query matches everything.
pub fn filter_records<'a>(records: &'a [PromptRecord], query: &str) -> Vec<&'a PromptRecord> {
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|r| matches_query(r, &needle))
        .collect()
}

/// `needle` must already be lowercased.
fn matches_query(record: &PromptRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    record.name.to_lowercase().contains(needle)
        || record
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(id: i64, name: &str, tags: &[&str]) -> PromptRecord {
        PromptRecord {
            id,
            name: name.into(),
            comment: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            prompt: "p".into(),
        }
    }

    fn ids(filtered: &[&PromptRecord]) -> Vec<i64> {
        filtered.iter().map(|r| r.id).collect()
    }

    #[test]
    fn empty_query_returns_everything_in_order() {
        let records = vec![record(3, "c", &[]), record(1, "a", &[]), record(2, "b", &[])];
        assert_eq!(ids(&filter_records(&records, "")), vec![3, 1, 2]);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let records = vec![record(1, "Foo", &[]), record(2, "bar", &[])];
        assert_eq!(ids(&filter_records(&records, "foo")), vec![1]);
        assert_eq!(ids(&filter_records(&records, "BAR")), vec![2]);
    }

    #[test]
    fn matches_tags_by_substring() {
        let records = vec![
            record(1, "one", &["Writing", "email"]),
            record(2, "two", &["code"]),
            record(3, "three", &[]),
        ];
        assert_eq!(ids(&filter_records(&records, "writ")), vec![1]);
        assert_eq!(ids(&filter_records(&records, "o")), vec![1, 2, 3]);
    }

    #[test]
    fn does_not_match_comment_or_prompt() {
        let mut r = record(1, "name", &[]);
        r.comment = "needle".into();
        r.prompt = "needle".into();
        assert!(filter_records(&[r], "needle").is_empty());
    }

    proptest! {
        #[test]
        fn result_is_an_ordered_subsequence(
            names in proptest::collection::vec("[a-zA-Z]{1,8}", 0..20),
            query in "[a-z]{0,3}",
        ) {
            let records: Vec<PromptRecord> = names
                .iter()
                .enumerate()
                .map(|(i, n)| record(i as i64, n, &[]))
                .collect();
            let filtered = ids(&filter_records(&records, &query));
            let mut sorted = filtered.clone();
            sorted.sort();
            prop_assert_eq!(&filtered, &sorted);
            prop_assert!(filtered.len() <= records.len());
        }
    }
}
