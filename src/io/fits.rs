//! Minimal FITS primary-HDU reader and writer.
//!
//! Only what density cubes need:
//!
//! - 2880-byte blocks of 80-byte header cards, terminated by `END`
//! - logical, integer, real and string card values
//! - big-endian image data for every standard `BITPIX`, scaled by `BSCALE`/`BZERO`
//!
//! Extensions after the primary HDU are ignored. Written files always use
//! `BITPIX = -64`.

use std::fs;
use std::path::Path;

use crate::error::{AppError, AppResult};

pub const BLOCK: usize = 2880;
pub const CARD: usize = 80;

/// Value of one header card.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    Logical(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

impl HeaderValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            HeaderValue::Integer(i) => Some(*i as f64),
            HeaderValue::Real(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            HeaderValue::Integer(i) => Some(*i),
            HeaderValue::Real(r) if r.fract() == 0.0 => Some(*r as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HeaderValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn format(&self) -> String {
        match self {
            HeaderValue::Logical(b) => format!("{:>20}", if *b { "T" } else { "F" }),
            HeaderValue::Integer(i) => format!("{i:>20}"),
            HeaderValue::Real(r) => format!("{:>20}", format!("{r:.16E}")),
            HeaderValue::Text(s) => format!("'{:<8}'", s.replace('\'', "''")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCard {
    pub key: String,
    pub value: Option<HeaderValue>,
    pub comment: Option<String>,
}

impl HeaderCard {
    pub fn new(key: &str, value: HeaderValue, comment: &str) -> Self {
        Self {
            key: key.to_string(),
            value: Some(value),
            comment: (!comment.is_empty()).then(|| comment.to_string()),
        }
    }

    /// Render as exactly 80 ASCII bytes.
    fn render(&self) -> String {
        let mut line = format!("{:<8}", self.key);
        match (&self.value, &self.comment) {
            (Some(value), comment) => {
                line.push_str("= ");
                line.push_str(&value.format());
                if let Some(comment) = comment {
                    line.push_str(" / ");
                    line.push_str(comment);
                }
            }
            (None, Some(text)) => line.push_str(text),
            (None, None) => {}
        }
        let mut line: String = line.chars().filter(|c| c.is_ascii()).take(CARD).collect();
        while line.len() < CARD {
            line.push(' ');
        }
        line
    }
}

/// Ordered header cards (excluding `END`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitsHeader {
    pub cards: Vec<HeaderCard>,
}

impl FitsHeader {
    pub fn get(&self, key: &str) -> Option<&HeaderValue> {
        self.cards
            .iter()
            .find(|c| c.key == key)
            .and_then(|c| c.value.as_ref())
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(HeaderValue::as_f64)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(HeaderValue::as_i64)
    }

    /// Set or replace a card, keeping its position when it already exists.
    pub fn set(&mut self, key: &str, value: HeaderValue, comment: &str) {
        let card = HeaderCard::new(key, value, comment);
        match self.cards.iter_mut().find(|c| c.key == key) {
            Some(existing) => *existing = card,
            None => self.cards.push(card),
        }
    }
}

/// Primary image HDU with data converted to `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct FitsImage {
    pub header: FitsHeader,
    /// `NAXIS1..NAXISn` (NAXIS1 varies fastest in `data`).
    pub shape: Vec<usize>,
    pub data: Vec<f64>,
}

pub fn read_fits(path: &Path) -> AppResult<FitsImage> {
    let bytes = fs::read(path).map_err(|e| AppError::io("Failed to read FITS file", path, e))?;
    parse_fits(&bytes, path)
}

pub fn write_fits(path: &Path, image: &FitsImage) -> AppResult<()> {
    let bytes = encode_fits(image);
    fs::write(path, bytes).map_err(|e| AppError::io("Failed to write FITS file", path, e))
}

/// Parse the primary HDU of an in-memory FITS file. `path` is used for errors only.
pub fn parse_fits(bytes: &[u8], path: &Path) -> AppResult<FitsImage> {
    let (header, data_start) = parse_header(bytes, path)?;

    match header.get("SIMPLE") {
        Some(HeaderValue::Logical(true)) => {}
        _ => return Err(AppError::fits(path, "first card must be SIMPLE = T")),
    }

    let bitpix = header
        .get_i64("BITPIX")
        .ok_or_else(|| AppError::missing_metadata("BITPIX", path.display().to_string()))?;
    let naxis = header
        .get_i64("NAXIS")
        .ok_or_else(|| AppError::missing_metadata("NAXIS", path.display().to_string()))?;
    if !(0..=999).contains(&naxis) {
        return Err(AppError::fits(path, format!("invalid NAXIS {naxis}")));
    }

    let mut shape = Vec::with_capacity(naxis as usize);
    for i in 1..=naxis {
        let key = format!("NAXIS{i}");
        let len = header
            .get_i64(&key)
            .ok_or_else(|| AppError::missing_metadata(key.clone(), path.display().to_string()))?;
        if len < 0 {
            return Err(AppError::fits(path, format!("{key} is negative")));
        }
        shape.push(len as usize);
    }

    let count = if shape.is_empty() {
        Some(0)
    } else {
        shape.iter().try_fold(1usize, |acc, &len| acc.checked_mul(len))
    };
    let width = match bitpix {
        8 => 1,
        16 => 2,
        32 | -32 => 4,
        64 | -64 => 8,
        other => return Err(AppError::fits(path, format!("unsupported BITPIX {other}"))),
    };

    let (needed, data_end) = count
        .and_then(|c| c.checked_mul(width))
        .and_then(|needed| Some((needed, data_start.checked_add(needed)?)))
        .ok_or_else(|| AppError::fits(path, format!("image size overflows: shape {shape:?}")))?;
    let raw = bytes
        .get(data_start..data_end)
        .ok_or_else(|| {
            AppError::fits(
                path,
                format!(
                    "data section truncated: need {needed} bytes, have {}",
                    bytes.len().saturating_sub(data_start)
                ),
            )
        })?;

    let bscale = header.get_f64("BSCALE").unwrap_or(1.0);
    let bzero = header.get_f64("BZERO").unwrap_or(0.0);
    let data = raw
        .chunks_exact(width)
        .map(|b| {
            let v = decode_value(bitpix, b);
            bzero + bscale * v
        })
        .collect();

    Ok(FitsImage {
        header,
        shape,
        data,
    })
}

fn decode_value(bitpix: i64, b: &[u8]) -> f64 {
    match bitpix {
        8 => b[0] as f64,
        16 => i16::from_be_bytes([b[0], b[1]]) as f64,
        32 => i32::from_be_bytes([b[0], b[1], b[2], b[3]]) as f64,
        64 => i64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]) as f64,
        -32 => f32::from_be_bytes([b[0], b[1], b[2], b[3]]) as f64,
        _ => f64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]),
    }
}

/// Parse header cards up to `END`; returns the header and the data offset.
fn parse_header(bytes: &[u8], path: &Path) -> AppResult<(FitsHeader, usize)> {
    let mut header = FitsHeader::default();
    let mut offset = 0;

    loop {
        let card = bytes
            .get(offset..offset + CARD)
            .ok_or_else(|| AppError::fits(path, "header ended without an END card"))?;
        offset += CARD;

        let text = std::str::from_utf8(card)
            .ok()
            .filter(|t| t.is_ascii())
            .ok_or_else(|| AppError::fits(path, format!("non-ASCII header card at byte {}", offset - CARD)))?;
        let key = text[..8].trim_end();
        if key == "END" {
            break;
        }
        header.cards.push(parse_card(text, path)?);
    }

    let data_start = offset.div_ceil(BLOCK) * BLOCK;
    Ok((header, data_start))
}

fn parse_card(text: &str, path: &Path) -> AppResult<HeaderCard> {
    let key = text[..8].trim_end().to_string();
    if &text[8..10] != "= " {
        // COMMENT, HISTORY, blank and other commentary cards.
        let rest = text[8..].trim_end();
        return Ok(HeaderCard {
            key,
            value: None,
            comment: (!rest.is_empty()).then(|| rest.trim_start().to_string()),
        });
    }

    let field = &text[10..];
    let (value, comment) = if field.trim_start().starts_with('\'') {
        parse_string_value(field)
            .ok_or_else(|| AppError::fits(path, format!("unterminated string in card {key}")))?
    } else {
        let (raw, comment) = match field.find('/') {
            Some(i) => (&field[..i], Some(field[i + 1..].trim().to_string())),
            None => (field, None),
        };
        let value = parse_scalar(raw.trim())
            .ok_or_else(|| AppError::fits(path, format!("cannot parse value of card {key}: '{}'", raw.trim())))?;
        (value, comment)
    };

    Ok(HeaderCard {
        key,
        value: Some(value),
        comment: comment.filter(|c| !c.is_empty()),
    })
}

fn parse_string_value(field: &str) -> Option<(HeaderValue, Option<String>)> {
    let start = field.find('\'')? + 1;
    let chars: Vec<char> = field[start..].chars().collect();
    let mut out = String::new();
    let mut i = 0;
    loop {
        let c = *chars.get(i)?;
        if c == '\'' {
            if chars.get(i + 1) == Some(&'\'') {
                out.push('\'');
                i += 2;
                continue;
            }
            break;
        }
        out.push(c);
        i += 1;
    }
    let rest: String = chars[i + 1..].iter().collect();
    let comment = rest.find('/').map(|j| rest[j + 1..].trim().to_string());
    Some((HeaderValue::Text(out.trim_end().to_string()), comment))
}

fn parse_scalar(raw: &str) -> Option<HeaderValue> {
    match raw {
        "T" => return Some(HeaderValue::Logical(true)),
        "F" => return Some(HeaderValue::Logical(false)),
        _ => {}
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Some(HeaderValue::Integer(i));
    }
    raw.replace(['D', 'd'], "E").parse::<f64>().ok().map(HeaderValue::Real)
}

/// Serialise an image as a `BITPIX = -64` primary HDU.
///
/// Structural cards (`SIMPLE`, `BITPIX`, `NAXIS*`, `BSCALE`, `BZERO`, `END`)
/// are generated from `shape`; other header cards are copied in order.
pub fn encode_fits(image: &FitsImage) -> Vec<u8> {
    let mut cards = vec![
        HeaderCard::new("SIMPLE", HeaderValue::Logical(true), "conforms to FITS standard"),
        HeaderCard::new("BITPIX", HeaderValue::Integer(-64), "IEEE double precision"),
        HeaderCard::new("NAXIS", HeaderValue::Integer(image.shape.len() as i64), ""),
    ];
    for (i, len) in image.shape.iter().enumerate() {
        cards.push(HeaderCard::new(
            &format!("NAXIS{}", i + 1),
            HeaderValue::Integer(*len as i64),
            "",
        ));
    }
    for card in &image.header.cards {
        if is_structural(&card.key) {
            continue;
        }
        cards.push(card.clone());
    }

    let mut out = Vec::new();
    for card in &cards {
        out.extend_from_slice(card.render().as_bytes());
    }
    out.extend_from_slice(format!("{:<80}", "END").as_bytes());
    pad_to_block(&mut out, b' ');

    for v in &image.data {
        out.extend_from_slice(&v.to_be_bytes());
    }
    pad_to_block(&mut out, 0);
    out
}

fn is_structural(key: &str) -> bool {
    matches!(key, "SIMPLE" | "BITPIX" | "NAXIS" | "BSCALE" | "BZERO" | "END" | "EXTEND")
        || (key.starts_with("NAXIS") && key[5..].chars().all(|c| c.is_ascii_digit()))
}

fn pad_to_block(buf: &mut Vec<u8>, fill: u8) {
    let rem = buf.len() % BLOCK;
    if rem != 0 {
        buf.resize(buf.len() + BLOCK - rem, fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(s: &str) -> String {
        format!("{s:<80}")
    }

    fn int16_file() -> Vec<u8> {
        let mut bytes = String::new();
        bytes.push_str(&card("SIMPLE  =                    T"));
        bytes.push_str(&card("BITPIX  =                   16"));
        bytes.push_str(&card("NAXIS   =                    1"));
        bytes.push_str(&card("NAXIS1  =                    3"));
        bytes.push_str(&card("BSCALE  =                  2.0"));
        bytes.push_str(&card("BZERO   =               1.0D+1 / offset"));
        bytes.push_str(&card("OBJECT  = 'S 61''s shell'      / name"));
        bytes.push_str(&card("HISTORY made by hand"));
        bytes.push_str(&card("END"));
        let mut out = bytes.into_bytes();
        pad_to_block(&mut out, b' ');
        for v in [1i16, -2, 300] {
            out.extend_from_slice(&v.to_be_bytes());
        }
        pad_to_block(&mut out, 0);
        out
    }

    #[test]
    fn parses_scaled_integer_image() {
        let img = parse_fits(&int16_file(), Path::new("hand.fits")).unwrap();
        assert_eq!(img.shape, vec![3]);
        assert_eq!(img.data, vec![12.0, 6.0, 610.0]);
        assert_eq!(img.header.get_f64("BZERO"), Some(10.0));
        assert_eq!(
            img.header.get("OBJECT").and_then(HeaderValue::as_str),
            Some("S 61's shell")
        );
        let history = img.header.cards.iter().find(|c| c.key == "HISTORY").unwrap();
        assert!(history.value.is_none());
    }

    #[test]
    fn written_files_are_block_aligned_and_reload() {
        let mut header = FitsHeader::default();
        header.set("CDELT1", HeaderValue::Real(0.0125), "pc per pixel");
        header.set("BUNIT", HeaderValue::Text("cm-3".into()), "");
        let image = FitsImage {
            header,
            shape: vec![2, 2, 2],
            data: vec![0.0, 1.5, -2.25, 3.0, 1e-30, 7.0, 8.0, 9.125],
        };
        let bytes = encode_fits(&image);
        assert_eq!(bytes.len() % BLOCK, 0);

        let back = parse_fits(&bytes, Path::new("mem.fits")).unwrap();
        assert_eq!(back.shape, image.shape);
        assert_eq!(back.data, image.data);
        assert_eq!(back.header.get_f64("CDELT1"), Some(0.0125));
        assert_eq!(back.header.get("BUNIT").and_then(HeaderValue::as_str), Some("cm-3"));
    }

    #[test]
    fn missing_end_is_an_error() {
        let bytes = card("SIMPLE  =                    T").into_bytes();
        let err = parse_fits(&bytes, Path::new("x.fits")).unwrap_err();
        assert!(matches!(err, AppError::Fits { .. }), "{err}");
    }

    #[test]
    fn oversized_shape_is_rejected_not_overflowed() {
        let mut bytes = String::new();
        bytes.push_str(&card("SIMPLE  =                    T"));
        bytes.push_str(&card("BITPIX  =                  -64"));
        bytes.push_str(&card("NAXIS   =                    3"));
        for axis in 1..=3 {
            bytes.push_str(&card(&format!("NAXIS{axis}  =             10000000")));
        }
        bytes.push_str(&card("END"));
        let mut bytes = bytes.into_bytes();
        pad_to_block(&mut bytes, b' ');

        let err = parse_fits(&bytes, Path::new("huge.fits")).unwrap_err();
        assert!(matches!(err, AppError::Fits { .. }), "{err}");
        assert!(err.to_string().contains("overflows"), "{err}");
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn truncated_data_is_an_error() {
        let mut bytes = int16_file();
        bytes.truncate(BLOCK + 2);
        let err = parse_fits(&bytes, Path::new("x.fits")).unwrap_err();
        assert!(err.to_string().contains("truncated"), "{err}");
    }

    #[test]
    fn rendered_cards_are_80_bytes() {
        let c = HeaderCard::new("XOFF", HeaderValue::Real(-0.03), "x offset of centre (pc)");
        let r = c.render();
        assert_eq!(r.len(), CARD);
        assert!(r.starts_with("XOFF    = "));
    }
}
