//! A1 notation helpers for addressing sheet cells

/// Convert a zero-based column index to its A1 column letters
///
/// `0 -> "A"`, `25 -> "Z"`, `26 -> "AA"`.
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Qualify a range with its tab name, quoting the tab when needed
pub fn qualified(tab: &str, range: &str) -> String {
    let plain = tab
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        format!("{}!{}", tab, range)
    } else {
        format!("'{}'!{}", tab.replace('\'', "''"), range)
    }
}

/// Range covering one full row of `width` columns, starting at column A
pub fn row_range(tab: &str, row: u32, width: usize) -> String {
    let last = column_letter(width.max(1) - 1);
    qualified(tab, &format!("A{}:{}{}", row, last, row))
}
