// src/workspace/column_label.rs
//! Spreadsheet-style column names: bijective base-26 with no zero digit.

/// `0 -> "A"`, `25 -> "Z"`, `26 -> "AA"`, `701 -> "ZZ"`, `702 -> "AAA"`.
pub fn column_label(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    // Only ASCII uppercase letters are pushed above.
    String::from_utf8(letters).unwrap_or_default()
}

/// Inverse of [`column_label`]. Accepts upper or lower case; returns `None`
/// for empty input, non-letters, or overflow.
pub fn column_index(label: &str) -> Option<usize> {
    if label.is_empty() {
        return None;
    }
    let mut value: usize = 0;
    for ch in label.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let digit = (ch.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        value = value.checked_mul(26)?.checked_add(digit)?;
    }
    Some(value - 1)
}

/// Splits `"AB12"` into `(27, 11)`: zero-based column and row.
pub fn parse_cell_name(name: &str) -> Option<(usize, usize)> {
    let split = name.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = name.split_at(split);
    let col = column_index(letters)?;
    let row_number: usize = digits.parse().ok()?;
    if row_number == 0 {
        return None;
    }
    Some((col, row_number - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn known_labels() {
        assert_eq!(column_label(0), "A");
        assert_eq!(column_label(25), "Z");
        assert_eq!(column_label(26), "AA");
        assert_eq!(column_label(27), "AB");
        assert_eq!(column_label(51), "AZ");
        assert_eq!(column_label(52), "BA");
        assert_eq!(column_label(701), "ZZ");
        assert_eq!(column_label(702), "AAA");
    }

    #[test]
    fn labels_are_injective_and_invertible() {
        let mut seen = HashSet::new();
        for i in 0..10_000 {
            let label = column_label(i);
            assert!(seen.insert(label.clone()), "duplicate label {label} for {i}");
            assert_eq!(column_index(&label), Some(i));
        }
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(column_index(""), None);
        assert_eq!(column_index("A1"), None);
        assert_eq!(column_index("aa"), Some(26));
        assert_eq!(parse_cell_name("C7"), Some((2, 6)));
        assert_eq!(parse_cell_name("C0"), None);
        assert_eq!(parse_cell_name("12"), None);
    }
}
