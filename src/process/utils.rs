/// A parsed CSV field as a cell. Only a zero-length field is missing; text
/// is kept verbatim, surrounding whitespace included, so header, marker and
/// title comparisons see exactly what the export holds.
pub fn cell_value(field: &str) -> Option<String> {
    if field.is_empty() {
        None
    } else {
        Some(field.to_string())
    }
}

/// Title-case a name: the first letter of every alphabetic run is upper-cased,
/// the rest lower-cased. Apostrophes and hyphens start a new run, so
/// "o'neil-SMITH" becomes "O'Neil-Smith".
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
