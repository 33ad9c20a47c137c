use once_cell::sync::Lazy;
use regex::Regex;

/// Canonical unit labels used across the output documents.
pub const DIFFUSIVITY_UNIT: &str = "mm²/s";
pub const CONDUCTIVITY_UNIT: &str = "W/(m·K)";
pub const FLUENCE_UNIT: &str = "J/cm²";
pub const TEMPERATURE_UNIT: &str = "K";

/// Longest trailing text still considered a plausible unit.
const MAX_UNIT_LEN: usize = 16;

static VALUE_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)\s*(.*?)\s*$")
        .expect("value pattern is valid")
});

static FORMATTED_SCI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d\.\d+[eE][+-]\d+$").expect("sci pattern is valid"));

/// A `<number><trailing unit text>` string split into its parts.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedValue {
    pub value: f64,
    /// Trailing unit text, only when it passed the plausibility check
    pub unit: Option<String>,
}

/// Parse a raw value string. Returns `None` when the leading number itself
/// is unparseable; callers skip and log such values, never default to zero.
/// Implausible trailing text yields `unit: None` so the property's declared
/// default unit applies instead of the parsed text.
pub fn parse_value_text(raw: &str) -> Option<ParsedValue> {
    let captures = VALUE_TEXT.captures(raw)?;
    let value: f64 = captures.get(1)?.as_str().parse().ok()?;
    let trailing = captures.get(2).map(|m| m.as_str()).unwrap_or("");
    let unit = if !trailing.is_empty() && unit_plausible(trailing) {
        Some(trailing.to_string())
    } else {
        None
    };
    Some(ParsedValue { value, unit })
}

/// Whether trailing text looks like a unit: short, at least one letter, and
/// only characters that occur in unit notation.
fn unit_plausible(text: &str) -> bool {
    if text.chars().count() > MAX_UNIT_LEN {
        return false;
    }
    if !text.chars().any(char::is_alphabetic) {
        return false;
    }
    text.chars().all(|c| {
        c.is_ascii_alphanumeric()
            || c.is_alphabetic()
            || "°²³·×⁻⁰¹⁴⁵⁶⁷⁸⁹/^{}(). -%*".contains(c)
    })
}

/// Collapse a unit string to a comparison key: lowercase, superscripts and
/// multiplication signs folded to ASCII, spacing and caret noise removed.
fn unit_key(unit: &str) -> String {
    unit.to_lowercase()
        .chars()
        .filter_map(|c| match c {
            '²' => Some('2'),
            '³' => Some('3'),
            '⁰' => Some('0'),
            '¹' => Some('1'),
            '⁴' => Some('4'),
            '⁵' => Some('5'),
            '⁶' => Some('6'),
            '⁷' => Some('7'),
            '⁸' => Some('8'),
            '⁹' => Some('9'),
            '⁻' => Some('-'),
            '×' => Some('x'),
            ' ' | '^' | '{' | '}' | '*' => None,
            other => Some(other),
        })
        .collect()
}

/// Multiplier taking a diffusivity value in the given unit to mm²/s.
/// `None` for units the pipeline does not recognize.
pub fn diffusivity_scale(unit: &str) -> Option<f64> {
    let key = unit_key(unit);
    if key.is_empty() || key.contains("mm2/s") {
        Some(1.0)
    } else if key.contains("10-5") && key.contains("m2/s") {
        // "×10⁻⁵ m²/s" notation: 1e-5 m²/s is 10 mm²/s
        Some(10.0)
    } else if key.ends_with("m2/s") {
        Some(1e6)
    } else {
        None
    }
}

/// Multiplier taking a fluence value in the given unit to J/cm².
pub fn fluence_scale(unit: &str) -> Option<f64> {
    let key = unit_key(unit);
    if key.is_empty() || key.contains("j/cm2") {
        Some(1.0)
    } else if key.contains("j/m2") {
        Some(1e-4)
    } else {
        None
    }
}

/// Convert a temperature in the given unit to Kelvin. A missing unit is
/// treated as °C, matching the upstream stores.
pub fn temperature_to_kelvin(value: f64, unit: Option<&str>) -> Option<f64> {
    match unit.map(unit_key).as_deref() {
        None | Some("") | Some("°c") | Some("c") | Some("celsius") => Some(value + 273.15),
        Some("k") | Some("kelvin") => Some(value),
        _ => None,
    }
}

/// Format a numeric value for display. Idempotent together with
/// [`format_display`]: formatting an already-formatted value returns the
/// same string.
pub fn format_value(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if magnitude < 0.01 || magnitude >= 1_000_000.0 {
        scientific_2sf(value)
    } else if magnitude < 1.0 {
        trim_trailing_zeros(format!("{:.2}", value))
    } else if magnitude < 100.0 {
        trim_trailing_zeros(format!("{:.1}", value))
    } else {
        format!("{:.0}", value)
    }
}

/// 2-significant-figure scientific notation with a signed two-digit
/// exponent, e.g. `3.8e+07`.
fn scientific_2sf(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();
    let mut exponent = magnitude.log10().floor() as i32;
    let mut mantissa = magnitude / 10f64.powi(exponent);
    mantissa = (mantissa * 10.0).round() / 10.0;
    if mantissa >= 10.0 {
        mantissa /= 10.0;
        exponent += 1;
    }
    format!("{}{:.1}e{:+03}", sign, mantissa, exponent)
}

fn trim_trailing_zeros(formatted: String) -> String {
    if !formatted.contains('.') {
        return formatted;
    }
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Display formatting over strings, the idempotent outer step. Already
/// formatted input (including scientific notation whose re-parse would land
/// in a different band) comes back unchanged.
pub fn format_display(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(value) => {
            let formatted = format_value(value);
            if formatted == trimmed || FORMATTED_SCI.is_match(trimmed) {
                trimmed.to_string()
            } else {
                formatted
            }
        }
        Err(_) => trimmed.to_string(),
    }
}
