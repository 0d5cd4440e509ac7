//! Measurement pass and greedy two-column balancing.
//!
//! Each group is assigned to whichever column is currently shorter
//! (ties go left), which bounds the final height difference by the
//! largest single group. Deterministic and O(n); deliberately not a
//! bin-packing solver, so existing sheets keep their layout.

use crate::record::ItemGroup;
use crate::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    Left,
    Right,
}

/// One group's cached placement: column, top Y, estimated height.
#[derive(Clone, Copy, Debug)]
pub struct GroupSlot {
    pub column: Column,
    pub y: f64,
    pub height: f64,
}

/// The layout plan for one sheet. Slots are index-aligned with the
/// groups passed to [`measure`]; the content pass reuses them instead
/// of re-deciding column assignment.
#[derive(Clone, Debug)]
pub struct SheetLayout {
    pub slots: Vec<GroupSlot>,
    pub left_total: f64,
    pub right_total: f64,
    pub canvas_height: u32,
}

/// Estimated rendered height of one group: title line + one row per
/// record + note sub-band (when the group carries a note) + spacing.
/// Empty spec text still gets a full row.
pub fn group_height(group: &ItemGroup, theme: &Theme) -> f64 {
    let note = if group.note().is_some() {
        theme.note_height
    } else {
        0.0
    };
    theme.title_height + theme.row_height * group.records.len() as f64 + note + theme.group_gap
}

/// Run the measurement pass over groups in first-seen order.
pub fn measure<'a, I>(groups: I, theme: &Theme) -> SheetLayout
where
    I: IntoIterator<Item = &'a ItemGroup>,
{
    let mut left = theme.header_offset;
    let mut right = theme.header_offset;
    let mut slots = Vec::new();
    for group in groups {
        let height = group_height(group, theme);
        let (column, cursor) = if left <= right {
            (Column::Left, &mut left)
        } else {
            (Column::Right, &mut right)
        };
        slots.push(GroupSlot {
            column,
            y: *cursor,
            height,
        });
        *cursor += height;
    }
    let canvas_height = (left.max(right) + theme.footer_allowance).ceil() as u32;
    tracing::debug!(left, right, canvas_height, "measured sheet layout");
    SheetLayout {
        slots,
        left_total: left,
        right_total: right,
        canvas_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::PriceRecord;

    fn group(name: &str, rows: usize, note: Option<&str>) -> ItemGroup {
        let records = (0..rows)
            .map(|i| PriceRecord {
                item_name: name.to_string(),
                spec: format!("規格{i}"),
                note: note.map(str::to_string),
                price_text: "100".to_string(),
            })
            .collect();
        ItemGroup {
            item_name: name.to_string(),
            records,
        }
    }

    #[test]
    fn first_group_goes_left_on_tie() {
        let theme = Theme::default();
        let groups = vec![group("a", 1, None), group("b", 1, None)];
        let layout = measure(&groups, &theme);
        assert_eq!(layout.slots[0].column, Column::Left);
        assert_eq!(layout.slots[1].column, Column::Right);
    }

    #[test]
    fn balance_bounded_by_largest_group() {
        let theme = Theme::default();
        let groups: Vec<ItemGroup> = (0..9)
            .map(|i| group(&format!("g{i}"), 1 + i % 5, (i % 3 == 0).then_some("代工")))
            .collect();
        let largest = groups
            .iter()
            .map(|g| group_height(g, &theme))
            .fold(0.0_f64, f64::max);
        let layout = measure(&groups, &theme);
        assert!((layout.left_total - layout.right_total).abs() <= largest);
    }

    #[test]
    fn canvas_taller_than_header_plus_footer() {
        let theme = Theme::default();
        let layout = measure(&[group("a", 1, None)], &theme);
        assert!(layout.canvas_height as f64 > theme.header_offset + theme.footer_allowance);
    }

    #[test]
    fn cursors_advance_monotonically_per_column() {
        let theme = Theme::default();
        let groups: Vec<ItemGroup> = (0..6).map(|i| group(&format!("g{i}"), 2, None)).collect();
        let layout = measure(&groups, &theme);
        let mut prev_left = 0.0;
        let mut prev_right = 0.0;
        for slot in &layout.slots {
            let prev = match slot.column {
                Column::Left => &mut prev_left,
                Column::Right => &mut prev_right,
            };
            assert!(slot.y >= *prev);
            *prev = slot.y + slot.height;
        }
        assert_eq!(layout.left_total, prev_left);
        assert_eq!(layout.right_total, prev_right);
    }

    #[test]
    fn note_adds_fixed_allowance() {
        let theme = Theme::default();
        let with = group_height(&group("a", 2, Some("可代工")), &theme);
        let without = group_height(&group("a", 2, None), &theme);
        assert_eq!(with - without, theme.note_height);
    }

    #[test]
    fn measure_is_deterministic() {
        let theme = Theme::default();
        let groups: Vec<ItemGroup> = (0..7)
            .map(|i| group(&format!("g{i}"), 1 + i % 4, None))
            .collect();
        let a = measure(&groups, &theme);
        let b = measure(&groups, &theme);
        assert_eq!(a.canvas_height, b.canvas_height);
        for (x, y) in a.slots.iter().zip(b.slots.iter()) {
            assert_eq!(x.column, y.column);
            assert_eq!(x.y, y.y);
        }
    }
}
