//! Runtime settings, read from the page's query string.
//!
//! `index.html?capacity=4&first=1&step=1&tween=0` starts with four slots,
//! feeds values 1, 2, 3, ... to adds whose input field is left blank, and
//! disables the grow animation.

use crate::error::VizError;
use crate::model::{Element, DEFAULT_CAPACITY};

/// Largest starting capacity the scene will lay out.
pub const MAX_INITIAL_CAPACITY: usize = 64;

/// Query keys [`VizConfig::from_pairs`] understands.
pub const QUERY_KEYS: [&str; 4] = ["capacity", "first", "step", "tween"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VizConfig {
    pub initial_capacity: usize,
    /// Value of the first element added.
    pub first_value: Element,
    /// Difference between consecutive added values.
    pub value_step: Element,
    /// Grow animation length in milliseconds; zero means instant.
    pub tween_ms: u32,
    pub canvas_id: &'static str,
    pub pseudo_code_id: &'static str,
    pub status_id: &'static str,
    pub add_button_id: &'static str,
    pub remove_button_id: &'static str,
    pub grow_button_id: &'static str,
    /// Number field read by "Add Element".
    pub value_input_id: &'static str,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            first_value: 5,
            value_step: 2,
            tween_ms: 400,
            canvas_id: "c",
            pseudo_code_id: "pseudo-code",
            status_id: "status",
            add_button_id: "add",
            remove_button_id: "remove",
            grow_button_id: "grow",
            value_input_id: "value",
        }
    }
}

impl VizConfig {
    /// Apply `key=value` overrides from a query string such as
    /// `location.search`. A leading `?` is optional, values are
    /// percent-decoded, and unknown keys are skipped.
    pub fn from_query(query: &str) -> Result<Self, VizError> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = query.split('&').filter(|p| !p.is_empty()).map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (percent_decode(key), percent_decode(value))
        });
        Self::from_pairs(pairs)
    }

    /// Apply already-decoded overrides, e.g. from `URLSearchParams`.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, VizError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut cfg = Self::default();
        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                "capacity" => {
                    let cap: usize = parse(key, value)?;
                    if cap > MAX_INITIAL_CAPACITY {
                        return Err(bad(key, value));
                    }
                    cfg.initial_capacity = cap;
                }
                "first" => cfg.first_value = parse(key, value)?,
                "step" => cfg.value_step = parse(key, value)?,
                "tween" => cfg.tween_ms = parse(key, value)?,
                _ => {}
            }
        }
        Ok(cfg)
    }

    pub fn values(&self) -> ValueSource {
        ValueSource {
            next: self.first_value,
            step: self.value_step,
        }
    }
}

/// Parse the "Add Element" input field. Blank means "use the next generated
/// value"; anything else must be an `i32`.
pub fn parse_element(raw: &str) -> Result<Option<Element>, VizError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|_| VizError::NotANumber(raw.to_owned()))
}

/// Decode `%XX` escapes and `+`. Malformed escapes are kept literally.
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                match (hex(bytes[i + 1]), hex(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push(hi << 4 | lo);
                        i += 2;
                    }
                    _ => out.push(b'%'),
                }
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, VizError> {
    value.parse().map_err(|_| bad(key, value))
}

fn bad(key: &str, value: &str) -> VizError {
    VizError::Config {
        key: key.to_owned(),
        value: value.to_owned(),
    }
}

/// Arithmetic sequence of values for the "Add Element" button.
#[derive(Clone, Debug)]
pub struct ValueSource {
    next: Element,
    step: Element,
}

impl ValueSource {
    /// Take back `value` if it is the last one handed out, so a remove
    /// followed by a blank add shows the same number again. Values typed by
    /// the user leave the sequence alone.
    pub fn give_back(&mut self, value: Element) {
        let last = self.next.wrapping_sub(self.step);
        if value == last {
            self.next = last;
        }
    }
}

impl Iterator for ValueSource {
    type Item = Element;

    fn next(&mut self) -> Option<Element> {
        let v = self.next;
        self.next = self.next.wrapping_add(self.step);
        Some(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_gives_defaults() {
        assert_eq!(VizConfig::from_query("").unwrap(), VizConfig::default());
        assert_eq!(VizConfig::from_query("?").unwrap(), VizConfig::default());
    }

    #[test]
    fn overrides_apply_and_unknown_keys_are_ignored() {
        let cfg = VizConfig::from_query("?capacity=4&first=-3&step=10&tween=0&theme=dark").unwrap();
        assert_eq!(cfg.initial_capacity, 4);
        assert_eq!(cfg.first_value, -3);
        assert_eq!(cfg.value_step, 10);
        assert_eq!(cfg.tween_ms, 0);
    }

    #[test]
    fn malformed_number_is_rejected() {
        let err = VizConfig::from_query("capacity=two").unwrap_err();
        assert_eq!(
            err,
            VizError::Config {
                key: "capacity".into(),
                value: "two".into()
            }
        );
        assert!(VizConfig::from_query("tween").is_err());
    }

    #[test]
    fn oversized_capacity_is_rejected() {
        assert!(VizConfig::from_query("capacity=64").is_ok());
        assert!(VizConfig::from_query("capacity=65").is_err());
    }

    #[test]
    fn default_values_match_worked_example() {
        let vals: Vec<_> = VizConfig::default().values().take(3).collect();
        assert_eq!(vals, vec![5, 7, 9]);
    }

    #[test]
    fn give_back_repeats_last_value_only() {
        let mut src = VizConfig::default().values();
        assert_eq!(src.next(), Some(5));
        assert_eq!(src.next(), Some(7));
        src.give_back(42);
        assert_eq!(src.next(), Some(9));
        src.give_back(9);
        assert_eq!(src.next(), Some(9));
    }

    #[test]
    fn percent_encoded_values_are_decoded() {
        let cfg = VizConfig::from_query("?first=%2D3&step=%31%30").unwrap();
        assert_eq!(cfg.first_value, -3);
        assert_eq!(cfg.value_step, 10);
        assert_eq!(percent_decode("a+b%20c%zz%4"), "a b c%zz%4");
    }

    #[test]
    fn from_pairs_takes_decoded_input() {
        let cfg = VizConfig::from_pairs([("capacity", "8"), ("first", "-1")]).unwrap();
        assert_eq!((cfg.initial_capacity, cfg.first_value), (8, -1));
    }

    #[test]
    fn element_input_parsing() {
        assert_eq!(parse_element("  "), Ok(None));
        assert_eq!(parse_element(" -12 "), Ok(Some(-12)));
        assert_eq!(parse_element("abc"), Err(VizError::NotANumber("abc".into())));
        assert!(parse_element("99999999999").is_err());
    }
}
