//! Property control: a list of `name = value` pairs mirrored into a hidden
//! field.
//!
//! Each option's value is `name=escaped-value`, where the value is escaped
//! with the legacy `escape()` scheme of web pages (`%XX` for Latin-1,
//! `%uXXXX` above). The hidden field joins the option values with commas.

use super::set_control::{encode_select_options, SelectOption};

/// Select list of properties, plus its encoded contents
#[derive(Debug, Clone, Default)]
pub struct PropertyControl {
    options: Vec<SelectOption>,
    selected: Option<usize>,
    contents: String,
}

impl PropertyControl {
    /// Create a control from (name, value) pairs
    pub fn new<'a>(properties: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let options: Vec<_> = properties
            .into_iter()
            .map(|(name, value)| property_option(name, value))
            .collect();
        let contents = encode_select_options(&options);
        Self {
            options,
            selected: None,
            contents,
        }
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    /// Encoded value of the hidden field
    pub fn contents(&self) -> &str {
        &self.contents
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index.filter(|&i| i < self.options.len());
    }

    /// Set property `name` to `value`, replacing an existing property of
    /// that name or appending a new one
    ///
    /// The changed property becomes selected. An empty name is ignored.
    /// Returns the index of the property.
    pub fn add_or_change(&mut self, name: &str, value: &str) -> Option<usize> {
        if name.is_empty() {
            return None;
        }

        let option = property_option(name, value);
        let index = match self
            .options
            .iter()
            .position(|existing| encoded_name(&existing.value) == name)
        {
            Some(index) => {
                self.options[index] = option;
                index
            }
            None => {
                self.options.push(option);
                self.options.len() - 1
            }
        };

        self.contents = encode_select_options(&self.options);
        self.selected = Some(index);
        Some(index)
    }

    /// Remove the selected property
    pub fn remove_selected(&mut self) -> Option<SelectOption> {
        let index = self.selected.take()?;
        let removed = self.options.remove(index);
        self.contents = encode_select_options(&self.options);
        Some(removed)
    }

    /// Name and unescaped value of the selected property, for the edit inputs
    pub fn selection(&self) -> Option<(String, String)> {
        let option = self.options.get(self.selected?)?;
        let (name, value) = option.value.split_once('=').unwrap_or(("", option.value.as_str()));
        Some((name.to_string(), unescape(value)))
    }
}

fn property_option(name: &str, value: &str) -> SelectOption {
    SelectOption::new(
        format!("{name} = {value}"),
        format!("{name}={}", escape(value)),
    )
}

fn encoded_name(encoded: &str) -> &str {
    encoded.split('=').next().unwrap_or_default()
}

fn is_unescaped(unit: u16) -> bool {
    u8::try_from(unit).is_ok_and(|b| {
        b.is_ascii_alphanumeric() || matches!(b, b'@' | b'*' | b'_' | b'+' | b'-' | b'.' | b'/')
    })
}

/// Legacy web `escape()`
pub fn escape(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    for unit in src.encode_utf16() {
        if is_unescaped(unit) {
            out.push(char::from(unit as u8));
        } else if unit <= 0xFF {
            out.push_str(&format!("%{unit:02X}"));
        } else {
            out.push_str(&format!("%u{unit:04X}"));
        }
    }
    out
}

fn is_hex(digits: &str) -> bool {
    digits.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Legacy web `unescape()`; malformed sequences are kept as they are
pub fn unescape(src: &str) -> String {
    let mut units: Vec<u16> = Vec::with_capacity(src.len());
    let mut rest = src;

    while let Some(ch) = rest.chars().next() {
        if ch == '%' {
            if let Some(unit) = rest
                .strip_prefix("%u")
                .or_else(|| rest.strip_prefix("%U"))
                .and_then(|hex| hex.get(..4))
                .filter(|hex| is_hex(hex))
                .and_then(|hex| u16::from_str_radix(hex, 16).ok())
            {
                units.push(unit);
                rest = &rest[6..];
                continue;
            }
            if let Some(unit) = rest
                .get(1..3)
                .filter(|hex| is_hex(hex))
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            {
                units.push(u16::from(unit));
                rest = &rest[3..];
                continue;
            }
        }

        let mut buf = [0u16; 2];
        units.extend_from_slice(ch.encode_utf16(&mut buf));
        rest = &rest[ch.len_utf8()..];
    }

    String::from_utf16_lossy(&units)
}
