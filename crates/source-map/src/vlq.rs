//! Base64 VLQ encoding of position correspondence tables.
//!
//! The `mappings` string groups segments by generated line (`;`) and
//! separates segments on a line with `,`. Every segment carries four
//! delta-coded fields: generated column, source index, original line and
//! original column. The generated column restarts from zero on every line,
//! the other three run across the whole string.

/// The base64 alphabet used by VLQ digits.
const BASE64_CHARS: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const VLQ_BASE_SHIFT: u32 = 5;
const VLQ_BASE_MASK: u64 = (1 << VLQ_BASE_SHIFT) - 1;
const VLQ_CONTINUATION_BIT: u64 = 1 << VLQ_BASE_SHIFT;

/// A single correspondence between a generated and an original position.
///
/// Lines are 1-based, columns are 0-based byte columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mapping {
    pub original_line: u32,
    pub original_column: u32,
    pub generated_line: u32,
    pub generated_column: u32,
}

/// A correspondence reconstructed from an encoded `mappings` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodedMapping {
    pub generated_line: u32,
    pub generated_column: u32,
    pub original_line: u32,
    pub original_column: u32,
    /// Index into `sources`. Always `Some(0)` for maps produced here.
    pub source_index: Option<u32>,
    /// Index into `names`. Never set for maps produced here.
    pub name_index: Option<u32>,
}

impl DecodedMapping {
    /// Drops the source/name indices.
    pub fn to_mapping(self) -> Mapping {
        Mapping {
            original_line: self.original_line,
            original_column: self.original_column,
            generated_line: self.generated_line,
            generated_column: self.generated_column,
        }
    }
}

/// Appends the VLQ digits of `value` to `out`.
pub fn encode_vlq(out: &mut String, value: i64) {
    let mut vlq = if value < 0 {
        (value.unsigned_abs() << 1) | 1
    } else {
        (value as u64) << 1
    };

    loop {
        let mut digit = vlq & VLQ_BASE_MASK;
        vlq >>= VLQ_BASE_SHIFT;
        if vlq > 0 {
            digit |= VLQ_CONTINUATION_BIT;
        }
        out.push(BASE64_CHARS[digit as usize] as char);
        if vlq == 0 {
            break;
        }
    }
}

fn base64_value(byte: u8) -> Option<u64> {
    let value = match byte {
        b'A'..=b'Z' => byte - b'A',
        b'a'..=b'z' => byte - b'a' + 26,
        b'0'..=b'9' => byte - b'0' + 52,
        b'+' => 62,
        b'/' => 63,
        _ => return None,
    };
    Some(u64::from(value))
}

/// Decodes every VLQ value in a segment.
///
/// Returns `None` for invalid characters, a dangling continuation digit, or
/// a value too large to represent.
pub fn decode_segment(segment: &str) -> Option<Vec<i64>> {
    let mut values = Vec::with_capacity(5);
    let mut accum: u64 = 0;
    let mut shift: u32 = 0;
    let mut pending = false;

    for byte in segment.bytes() {
        let digit = base64_value(byte)?;
        if shift > 60 {
            return None;
        }
        accum |= (digit & VLQ_BASE_MASK) << shift;
        if digit & VLQ_CONTINUATION_BIT != 0 {
            shift += VLQ_BASE_SHIFT;
            pending = true;
            continue;
        }

        let magnitude = (accum >> 1) as i64;
        values.push(if accum & 1 == 1 { -magnitude } else { magnitude });
        accum = 0;
        shift = 0;
        pending = false;
    }

    if pending {
        return None;
    }
    Some(values)
}

/// Encodes a correspondence table into a `mappings` string.
///
/// Entries are ordered by generated position; when two entries share a
/// generated position the first one in `mappings` wins. Entries on
/// generated line 0 cannot be represented and are dropped.
pub fn encode(mappings: &[Mapping]) -> String {
    let mut sorted: Vec<&Mapping> = mappings.iter().filter(|m| m.generated_line > 0).collect();
    sorted.sort_by_key(|m| (m.generated_line, m.generated_column));
    sorted.dedup_by_key(|m| (m.generated_line, m.generated_column));

    let mut out = String::with_capacity(sorted.len() * 6);
    let mut line = 1u32;
    let mut prev_generated_column = 0i64;
    let mut prev_original_line = 0i64;
    let mut prev_original_column = 0i64;
    let mut first_on_line = true;

    for mapping in sorted {
        while line < mapping.generated_line {
            out.push(';');
            line += 1;
            prev_generated_column = 0;
            first_on_line = true;
        }
        if !first_on_line {
            out.push(',');
        }
        first_on_line = false;

        let generated_column = i64::from(mapping.generated_column);
        let original_line = i64::from(mapping.original_line) - 1;
        let original_column = i64::from(mapping.original_column);

        encode_vlq(&mut out, generated_column - prev_generated_column);
        encode_vlq(&mut out, 0);
        encode_vlq(&mut out, original_line - prev_original_line);
        encode_vlq(&mut out, original_column - prev_original_column);

        prev_generated_column = generated_column;
        prev_original_line = original_line;
        prev_original_column = original_column;
    }

    out
}

/// Decodes a `mappings` string.
///
/// Empty or malformed segments are skipped, as are segments whose running
/// totals would overflow or produce a negative position.
pub fn decode(mappings: &str) -> Vec<DecodedMapping> {
    let mut decoded = Vec::new();
    let mut source_index = 0i64;
    let mut original_line = 0i64;
    let mut original_column = 0i64;
    let mut name_index = 0i64;

    for (line_idx, line) in mappings.split(';').enumerate() {
        let mut generated_column = 0i64;

        for segment in line.split(',') {
            if segment.is_empty() {
                continue;
            }
            let Some(fields) = decode_segment(segment) else {
                continue;
            };

            match fields.len() {
                1 => {
                    if let Some(column) = generated_column.checked_add(fields[0]) {
                        generated_column = column;
                    }
                    continue;
                }
                4 | 5 => {}
                _ => continue,
            }

            // A segment whose deltas overflow a running total is dropped
            // without touching any of them.
            let Some(next) = advance(
                [generated_column, source_index, original_line, original_column],
                [fields[0], fields[1], fields[2], fields[3]],
            ) else {
                continue;
            };
            let name = match fields.get(4) {
                Some(delta) => match name_index.checked_add(*delta) {
                    Some(index) => Some(index),
                    None => continue,
                },
                None => None,
            };
            [generated_column, source_index, original_line, original_column] = next;
            if let Some(index) = name {
                name_index = index;
            }

            let totals = [
                (line_idx + 1) as i64,
                generated_column,
                original_line.saturating_add(1),
                original_column,
                source_index,
            ];
            if let Some(entry) = decoded_entry(totals, name) {
                decoded.push(entry);
            }
        }
    }

    decoded
}

fn advance(totals: [i64; 4], deltas: [i64; 4]) -> Option<[i64; 4]> {
    let mut next = totals;
    for (total, delta) in next.iter_mut().zip(deltas) {
        *total = total.checked_add(delta)?;
    }
    Some(next)
}

fn decoded_entry(totals: [i64; 5], name: Option<i64>) -> Option<DecodedMapping> {
    let [generated_line, generated_column, original_line, original_column, source_index] =
        totals.map(|value| u32::try_from(value).ok());
    let name_index = match name {
        Some(index) => Some(u32::try_from(index).ok()?),
        None => None,
    };

    Some(DecodedMapping {
        generated_line: generated_line?,
        generated_column: generated_column?,
        original_line: original_line.filter(|line| *line > 0)?,
        original_column: original_column?,
        source_index: Some(source_index?),
        name_index,
    })
}
