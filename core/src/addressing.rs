/// Convert a zero-based column index to its spreadsheet letter (`0 -> "A"`, `26 -> "AA"`).
pub fn column_letter(col: usize) -> String {
    let mut col_index = col;
    let mut col_label = String::new();

    loop {
        let rem = (col_index % 26) as u8;
        col_label.push((b'A' + rem) as char);
        if col_index < 26 {
            break;
        }
        col_index = col_index / 26 - 1;
    }

    col_label.chars().rev().collect()
}

/// Parse a column letter (case-insensitive) into a zero-based index.
/// Returns `None` for empty or non-alphabetic input.
pub fn column_index(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }

    let mut col: usize = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let upper = ch.to_ascii_uppercase() as u8;
        col = col
            .checked_mul(26)?
            .checked_add((upper - b'A' + 1) as usize)?;
    }

    Some(col - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letter_examples() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(27), "AB");
        assert_eq!(column_letter(51), "AZ");
        assert_eq!(column_letter(52), "BA");
        assert_eq!(column_letter(702), "AAA");
    }

    #[test]
    fn letters_parse_back_to_indices() {
        for letters in ["A", "Z", "AA", "AZ", "BA", "ZZ", "AAA"] {
            let idx = column_index(letters).expect("letters should parse");
            assert_eq!(column_letter(idx), letters);
        }
        assert_eq!(column_index("ab"), Some(27));
    }

    #[test]
    fn rejects_malformed_letters() {
        assert_eq!(column_index(""), None);
        assert_eq!(column_index("A1"), None);
        assert_eq!(column_index("-"), None);
    }
}
