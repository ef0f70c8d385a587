use crate::error::{ConvertError, Result};

/// Round `s` up to the next tenth. Exact tenths are left alone.
fn ceil_tenth(s: f64) -> f64 {
    (s * 10.0).ceil() / 10.0
}

/// Convert an `H:M:S[.fraction]` performance into seconds, rounding the
/// seconds component up to the nearest tenth.
///
/// `row` only feeds the error message.
pub fn time_to_seconds(raw: &str, row: usize) -> Result<f64> {
    let invalid = || ConvertError::InvalidTimeFormat {
        row,
        value: raw.to_string(),
    };

    let parts: Vec<&str> = raw.split(':').collect();
    if parts.len() != 3 {
        return Err(invalid());
    }

    let mut hms = [0.0f64; 3];
    for (slot, part) in hms.iter_mut().zip(&parts) {
        let v: f64 = part.trim().parse().map_err(|_| invalid())?;
        if !v.is_finite() {
            return Err(invalid());
        }
        *slot = v;
    }
    let [hours, minutes, seconds] = hms;

    Ok((hours * 60.0 + minutes) * 60.0 + ceil_tenth(seconds))
}
