use std::slice;

use super::entry::{Entry, EntryKind};

/// Lazy filtered view over entries.
///
/// Cloning the view restarts it from the beginning of the collection.
#[derive(Debug, Clone)]
pub struct EntryQuery<'a> {
    entries: slice::Iter<'a, Entry>,
    filter: EntryFilter,
}

impl<'a> EntryQuery<'a> {
    pub(crate) fn new(entries: &'a [Entry], filter: EntryFilter) -> Self {
        Self {
            entries: entries.iter(),
            filter,
        }
    }
}

impl<'a> Iterator for EntryQuery<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<Self::Item> {
        let filter = &self.filter;
        self.entries.by_ref().find(|entry| filter.matches(entry))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.entries.size_hint().1)
    }
}

/// Normalized search text: case-insensitive substring on description and
/// category, or an exact `income`/`expense` token matched against the kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    needle: String,
    kind: Option<EntryKind>,
}

impl EntryFilter {
    pub fn new(text: &str) -> Self {
        let needle = text.trim().to_lowercase();
        let kind = match needle.as_str() {
            "income" => Some(EntryKind::Income),
            "expense" => Some(EntryKind::Expense),
            _ => None,
        };
        Self { needle, kind }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn matches(&self, entry: &Entry) -> bool {
        if self.is_empty() {
            return true;
        }
        entry.description.to_lowercase().contains(&self.needle)
            || entry.category.to_lowercase().contains(&self.needle)
            || self.kind == Some(entry.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entries() -> Vec<Entry> {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        vec![
            Entry::new("Grocery Store", 8_550, EntryKind::Expense, "Food & Dining", day),
            Entry::new("Salary Deposit", 260_000, EntryKind::Income, "Salary", day),
            Entry::new("Gas Station", 4_230, EntryKind::Expense, "Transportation", day),
        ]
    }

    #[test]
    fn empty_filter_yields_everything_in_order() {
        let data = entries();
        let all: Vec<_> = EntryQuery::new(&data, EntryFilter::new("   ")).collect();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].description, "Grocery Store");
    }

    #[test]
    fn substring_matches_description_or_category() {
        let data = entries();
        let by_desc: Vec<_> = EntryQuery::new(&data, EntryFilter::new("STATION")).collect();
        assert_eq!(by_desc.len(), 1);
        let by_category: Vec<_> = EntryQuery::new(&data, EntryFilter::new("dining")).collect();
        assert_eq!(by_category[0].description, "Grocery Store");
    }

    #[test]
    fn view_restarts_when_cloned() {
        let data = entries();
        let view = EntryQuery::new(&data, EntryFilter::new("expense"));
        let first: Vec<_> = view.clone().collect();
        let second: Vec<_> = view.collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }
}
