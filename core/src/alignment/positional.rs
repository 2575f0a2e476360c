use super::AlignedRow;

/// Identity alignment: row `i` pairs with row `i`, the longer side's tail is unmatched.
pub fn align_by_position(original_len: usize, modified_len: usize) -> Vec<AlignedRow> {
    let shared = original_len.min(modified_len);
    let mut rows = Vec::with_capacity(original_len.max(modified_len));

    rows.extend((0..shared).map(|idx| AlignedRow::matched(idx, idx)));
    rows.extend((shared..original_len).map(AlignedRow::removed));
    rows.extend((shared..modified_len).map(AlignedRow::added));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longer_original_yields_removed_tail() {
        assert_eq!(
            align_by_position(3, 1),
            vec![
                AlignedRow::matched(0, 0),
                AlignedRow::removed(1),
                AlignedRow::removed(2),
            ]
        );
    }

    #[test]
    fn longer_modified_yields_added_tail() {
        assert_eq!(
            align_by_position(1, 2),
            vec![AlignedRow::matched(0, 0), AlignedRow::added(1)]
        );
        assert!(align_by_position(0, 0).is_empty());
    }
}
