//! Simple TOML parser for display configuration
//!
//! Handles only the subset `display.toml` uses. It does NOT support the
//! full TOML language.
//!
//! Supported features:
//! - Key = value pairs (string, integer, boolean)
//! - Hexadecimal integers (`0x27`)
//! - [section] headers: `display`, `timing`, `glyphs`
//! - Comments (# ...)
//!
//! Unknown keys are ignored so newer config files still load on older
//! firmware; unknown sections are an error.

use super::{DisplayConfig, UnmappedGlyph};
use crate::glyph::MAX_CUSTOM_GLYPHS;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Invalid or unknown section header
    InvalidSection,
    /// Key outside any section
    MissingSection,
    /// Invalid value type or out-of-range value
    InvalidValue,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Display,
    Timing,
    Glyphs,
}

/// Parse TOML configuration into DisplayConfig
///
/// Starts from [`DisplayConfig::default`]; only keys present in `input`
/// change.
pub fn parse_config(input: &str) -> Result<DisplayConfig, ParseError> {
    let mut config = DisplayConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(section, key, value, &mut config)?;
        }
    }

    Ok(config)
}

/// Parse section header like "display" or "timing"
fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "display" => Ok(Section::Display),
        "timing" => Ok(Section::Timing),
        "glyphs" => Ok(Section::Glyphs),
        _ => Err(ParseError::InvalidSection),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut DisplayConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Root => return Err(ParseError::MissingSection),
        Section::Display => match key {
            "i2c_address" | "address" => {
                let address: u8 = parse_int(value)?;
                if address > 0x7F {
                    return Err(ParseError::InvalidValue);
                }
                config.i2c_address = address;
            }
            "i2c_frequency" | "frequency" => config.i2c_frequency = parse_int(value)?,
            "backlight" => config.backlight = parse_bool(value)?,
            _ => {} // Ignore unknown keys
        },
        Section::Timing => match key {
            "power_on_delay_ms" => config.power_on_delay_ms = parse_int(value)?,
            "init_attempts" => {
                let attempts: u8 = parse_int(value)?;
                if attempts == 0 {
                    return Err(ParseError::InvalidValue);
                }
                config.init_attempts = attempts;
            }
            "init_cooldown_ms" => config.init_cooldown_ms = parse_int(value)?,
            "enable_pulse_us" => {
                let us: u32 = parse_int(value)?;
                if !(DisplayConfig::MIN_ENABLE_PULSE_US..=DisplayConfig::MAX_ENABLE_PULSE_US)
                    .contains(&us)
                {
                    return Err(ParseError::InvalidValue);
                }
                config.enable_pulse_us = us;
            }
            "settle_ms" => config.settle_ms = parse_int(value)?,
            "print_retries" => config.print_retries = parse_int(value)?,
            "frame_dwell_ms" => config.frame_dwell_ms = parse_int(value)?,
            _ => {}
        },
        Section::Glyphs => match key {
            "unmapped" => config.unmapped = parse_unmapped(value)?,
            _ => {}
        },
    }
    Ok(())
}

/// Split `key = value`, dropping a trailing comment outside quotes
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, rest) = line.split_once('=')?;

    let mut in_string = false;
    let mut end = rest.len();
    for (i, c) in rest.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => {
                end = i;
                break;
            }
            _ => {}
        }
    }

    Some((key.trim(), rest[..end].trim()))
}

/// Parse a string value
fn parse_string(value: &str) -> &str {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

/// Parse a decimal or `0x` hexadecimal integer, `_` separators allowed
fn parse_int<T: TryFrom<u32>>(value: &str) -> Result<T, ParseError> {
    let (digits, radix) = match value.get(..2) {
        Some("0x" | "0X") => (&value[2..], 16),
        _ => (value, 10),
    };
    if digits.is_empty() || digits.starts_with('_') {
        return Err(ParseError::InvalidValue);
    }

    let mut n: u32 = 0;
    for c in digits.chars().filter(|&c| c != '_') {
        let digit = c.to_digit(radix).ok_or(ParseError::InvalidValue)?;
        n = n
            .checked_mul(radix)
            .and_then(|n| n.checked_add(digit))
            .ok_or(ParseError::InvalidValue)?;
    }
    T::try_from(n).map_err(|_| ParseError::InvalidValue)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse the unmapped-glyph policy
///
/// `"leading_byte"`, a one-character ASCII string, or a character code.
/// Codes below [`MAX_CUSTOM_GLYPHS`] print CGRAM slots and are rejected.
fn parse_unmapped(value: &str) -> Result<UnmappedGlyph, ParseError> {
    let code: u8 = if value.starts_with('"') {
        match parse_string(value) {
            "leading_byte" => return Ok(UnmappedGlyph::LeadingByte),
            s if s.len() == 1 && s.is_ascii() => s.as_bytes()[0],
            _ => return Err(ParseError::InvalidValue),
        }
    } else if value == "leading_byte" {
        return Ok(UnmappedGlyph::LeadingByte);
    } else {
        parse_int(value)?
    };

    if usize::from(code) < MAX_CUSTOM_GLYPHS {
        return Err(ParseError::InvalidValue);
    }
    Ok(UnmappedGlyph::Placeholder(code))
}
