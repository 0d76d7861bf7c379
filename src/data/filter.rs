use super::model::{LabeledPoint, LabeledSeries, Row};

// ---------------------------------------------------------------------------
// Series extraction: categorical filter + two-column projection
// ---------------------------------------------------------------------------

/// Which rows to keep and which columns to project out of them.
#[derive(Debug, Clone, Copy)]
pub struct Projection<'a> {
    pub filter_column: &'a str,
    pub filter_value: &'a str,
    pub label_column: &'a str,
    pub data_column: &'a str,
}

/// Keep rows whose `filter_column` equals `filter_value` exactly and project
/// each into `(label_column, parse_number(data_column))`.
///
/// Output keeps the input row order. A row lacking `label_column` gets an
/// empty label; a row lacking `data_column` gets `0`.
pub fn extract(rows: &[Row], projection: Projection<'_>) -> LabeledSeries {
    rows.iter()
        .filter(|row| {
            row.get(projection.filter_column).map(String::as_str) == Some(projection.filter_value)
        })
        .map(|row| {
            let label = row
                .get(projection.label_column)
                .cloned()
                .unwrap_or_default();
            let raw = row.get(projection.data_column).map(String::as_str);
            let value = match raw.and_then(parse_number) {
                Some(v) => v,
                None => {
                    log::warn!(
                        "{label}: non-numeric {} {:?}, substituting 0",
                        projection.data_column,
                        raw.unwrap_or("")
                    );
                    0.0
                }
            };
            LabeledPoint { label, value }
        })
        .collect()
}

/// Parse the leading decimal number of `s`, ignoring surrounding whitespace
/// and any trailing text (`"12.5%"` → `12.5`). Non-finite results are `None`.
pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if let Ok(v) = s.parse::<f64>() {
        return v.is_finite().then_some(v);
    }
    let prefix = &s[..numeric_prefix_len(s)];
    prefix.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Byte length of the longest `[+-]?digits[.digits][(e|E)[+-]?digits]` prefix.
fn numeric_prefix_len(s: &str) -> usize {
    let b = s.as_bytes();
    let digits = |mut i: usize| {
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut i = 0;
    if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
        i += 1;
    }
    let int_end = digits(i);
    let mut end = int_end;
    let mut mantissa_digits = int_end - i;
    if end < b.len() && b[end] == b'.' {
        let frac_end = digits(end + 1);
        mantissa_digits += frac_end - (end + 1);
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return 0;
    }
    if end < b.len() && (b[end] == b'e' || b[end] == b'E') {
        let mut j = end + 1;
        if j < b.len() && (b[j] == b'+' || b[j] == b'-') {
            j += 1;
        }
        let exp_end = digits(j);
        if exp_end > j {
            end = exp_end;
        }
    }
    end
}
