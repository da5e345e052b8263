use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// The slice of a donation record the search needs.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StockEntry {
    pub medicine: String,
    pub quantity: i32,
    pub expiry: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedicineSummary {
    pub name: String,
    pub quantity: i64,
    pub expiry: NaiveDate,
    pub available: bool,
}

/// Folds donation entries into one summary per medicine name.
///
/// Names are merged case-insensitively. The first entry seen for a name fixes
/// its display spelling and its position in the output, so callers pass entries
/// newest-first. Quantities are summed and the latest expiry is kept.
pub fn aggregate<I>(entries: I) -> Vec<MedicineSummary>
where
    I: IntoIterator<Item = StockEntry>,
{
    let mut summaries: Vec<MedicineSummary> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let key = entry.medicine.to_lowercase();

        match index.get(&key) {
            Some(&pos) => {
                let existing = &mut summaries[pos];
                existing.quantity += i64::from(entry.quantity);
                if entry.expiry > existing.expiry {
                    existing.expiry = entry.expiry;
                }
            }
            None => {
                index.insert(key, summaries.len());
                summaries.push(MedicineSummary {
                    name: entry.medicine,
                    quantity: i64::from(entry.quantity),
                    expiry: entry.expiry,
                    available: true,
                });
            }
        }
    }

    summaries
}

/// Trims a raw search string, rejecting blank input.
pub fn normalize_query(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|q| !q.is_empty())
}

/// Builds an ILIKE pattern matching `query` as a literal substring.
pub fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for ch in query.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}
