use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One sellable unit: a spec/price row belonging to a named item.
///
/// `price_text` is kept verbatim as entered by the operator ("1200",
/// "$1,200", "850元", "售完", ...); [`crate::price::parse`] derives a
/// comparable amount from it on demand.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PriceRecord {
    pub item_name: String,
    pub spec: String,
    #[serde(default)]
    pub note: Option<String>,
    pub price_text: String,
}

impl PriceRecord {
    /// The note with empty and `"nan"` placeholders treated as absent.
    /// Spreadsheet exports stringify missing cells as "nan".
    pub fn note(&self) -> Option<&str> {
        match self.note.as_deref().map(str::trim) {
            Some("") | Some("nan") | None => None,
            Some(s) => Some(s),
        }
    }

    pub fn has_price(&self) -> bool {
        !self.price_text.trim().is_empty()
    }
}

/// All records sharing one item name, rendered together as one
/// visual block. Record order is input order.
#[derive(Clone, Debug, Default)]
pub struct ItemGroup {
    pub item_name: String,
    pub records: Vec<PriceRecord>,
}

impl ItemGroup {
    /// First non-empty note in the group, if any. One note sub-band
    /// is drawn per group.
    pub fn note(&self) -> Option<&str> {
        self.records.iter().find_map(|r| r.note())
    }
}

/// Group records by item name, preserving first-seen order of names
/// and input order within each group.
pub fn group_records(records: &[PriceRecord]) -> Vec<ItemGroup> {
    let mut groups: Vec<ItemGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for r in records {
        if let Some(i) = index.get(&r.item_name) {
            groups[*i].records.push(r.clone());
        } else {
            let id = groups.len();
            groups.push(ItemGroup {
                item_name: r.item_name.clone(),
                records: vec![r.clone()],
            });
            index.insert(r.item_name.clone(), id);
        }
    }
    groups
}

/// The documented pre-filter: drop records with a blank price field,
/// then drop groups left empty. Callers apply this before `render`.
pub fn retain_priced(groups: &mut Vec<ItemGroup>) {
    for g in groups.iter_mut() {
        g.records.retain(PriceRecord::has_price);
    }
    groups.retain(|g| !g.records.is_empty());
}
