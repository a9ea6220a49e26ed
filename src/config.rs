//! Pin configuration and runtime settings.
//!
//! Pins are described by colon-separated strings:
//!
//! ```text
//! template:  name:mode:strategy:trigger:frequency:unit
//! override:  pin:name:mode:strategy:trigger:frequency:unit
//! ```
//!
//! Trailing fields may be omitted.  An empty field falls back to the
//! template's value, and the template's empty fields fall back to the hard
//! defaults, so `4::::::W` only changes the unit of pin 4.

use core::fmt;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::level::Level;

/// Capacity of a pin name or unit.
pub const LABEL_CAP: usize = 32;

/// Fixed-capacity display string used for pin names and units.
pub type Label = heapless::String<LABEL_CAP>;

/// Default poll interval for the observer loop.
const DEFAULT_POLL_INTERVAL_MS: u32 = 100;

// ---------------------------------------------------------------------------
// Enumerated fields
// ---------------------------------------------------------------------------

/// Hardware input mode requested from the device session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PinMode {
    #[default]
    Input,
    Pullup,
}

/// When an accepted sample is reduced and reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Reduce right after every accepted sample.
    #[default]
    Instant,
    /// Keep only the latest sample; reduce once per poll tick.
    Debounce,
}

/// Which transitions carry a rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Trigger {
    #[default]
    None,
    Falling,
    Rising,
    Any,
}

impl PinMode {
    pub const ALL: [Self; 2] = [Self::Input, Self::Pullup];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Pullup => "pullup",
        }
    }
}

impl Strategy {
    pub const ALL: [Self; 2] = [Self::Instant, Self::Debounce];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Instant => "instant",
            Self::Debounce => "debounce",
        }
    }
}

impl Trigger {
    pub const ALL: [Self; 4] = [Self::None, Self::Falling, Self::Rising, Self::Any];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Falling => "falling",
            Self::Rising => "rising",
            Self::Any => "any",
        }
    }

    /// Whether a transition into `value` belongs to this trigger's pattern.
    pub const fn matches(self, value: Level) -> bool {
        match self {
            Self::None => false,
            Self::Falling => matches!(value, Level::Low),
            Self::Rising => matches!(value, Level::High),
            Self::Any => true,
        }
    }
}

macro_rules! keyword_enum {
    ($ty:ty) => {
        impl $ty {
            /// Parse the lowercase keyword form.
            pub fn parse(raw: &str) -> Option<Self> {
                Self::ALL.into_iter().find(|v| v.as_str() == raw)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

keyword_enum!(PinMode);
keyword_enum!(Strategy);
keyword_enum!(Trigger);

/// Names a position in the configuration grammar, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Pin,
    Name,
    Mode,
    Strategy,
    Trigger,
    Frequency,
    Unit,
}

impl Field {
    /// Field order after the pin number.
    const TEMPLATE_ORDER: [Self; 6] = [
        Self::Name,
        Self::Mode,
        Self::Strategy,
        Self::Trigger,
        Self::Frequency,
        Self::Unit,
    ];

    /// Accepted values, for fields with an enumerated domain.
    pub fn allowed(self) -> Option<&'static str> {
        match self {
            Self::Mode => Some("input, pullup"),
            Self::Strategy => Some("instant, debounce"),
            Self::Trigger => Some("none, falling, rising, any"),
            Self::Frequency => Some("a positive number"),
            Self::Pin | Self::Name | Self::Unit => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pin => "pin",
            Self::Name => "name",
            Self::Mode => "mode",
            Self::Strategy => "strategy",
            Self::Trigger => "trigger",
            Self::Frequency => "frequency",
            Self::Unit => "unit",
        })
    }
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Values shared by every pin unless an override replaces them.
#[derive(Debug, Clone, PartialEq)]
pub struct PinDefaults {
    pub name: Label,
    pub mode: PinMode,
    pub strategy: Strategy,
    pub trigger: Trigger,
    pub frequency: f64,
    pub unit: Label,
}

impl Default for PinDefaults {
    fn default() -> Self {
        Self {
            name: Label::new(),
            mode: PinMode::Input,
            strategy: Strategy::Instant,
            trigger: Trigger::None,
            frequency: 1.0,
            unit: Label::new(),
        }
    }
}

/// Fully resolved settings for one observed pin.  Immutable after startup.
#[derive(Debug, Clone, PartialEq)]
pub struct PinConfig {
    pub pin: u16,
    pub name: Label,
    pub mode: PinMode,
    pub strategy: Strategy,
    pub trigger: Trigger,
    /// Impulses per unit; divides the hourly impulse rate.
    pub frequency: f64,
    pub unit: Label,
}

impl PinConfig {
    /// Apply `defaults` to `pin` with no overrides.
    pub fn from_defaults(pin: u16, defaults: &PinDefaults) -> Self {
        Self {
            pin,
            name: defaults.name.clone(),
            mode: defaults.mode,
            strategy: defaults.strategy,
            trigger: defaults.trigger,
            frequency: defaults.frequency,
            unit: defaults.unit.clone(),
        }
    }
}

impl fmt::Display for PinConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pin {} name={:?} mode={} strategy={} trigger={} frequency={} unit={:?}",
            self.pin,
            self.name.as_str(),
            self.mode,
            self.strategy,
            self.trigger,
            self.frequency,
            self.unit.as_str()
        )
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Resolve the template string against the hard defaults.
pub fn resolve_template(template: &str) -> Result<PinDefaults, ConfigError> {
    let fields: Vec<&str> = template.split(':').collect();
    apply_fields(None, &fields, &PinDefaults::default())
}

/// Resolve one `pin[:name[:mode[:strategy[:trigger[:frequency[:unit]]]]]]`
/// override against already-resolved template values.
pub fn resolve_pin(spec: &str, defaults: &PinDefaults) -> Result<PinConfig, ConfigError> {
    let mut fields = spec.split(':');
    let raw_pin = fields.next().unwrap_or_default();
    let pin: u16 = raw_pin.parse().map_err(|_| ConfigError::InvalidPin {
        value: raw_pin.to_owned(),
    })?;

    let rest: Vec<&str> = fields.collect();
    let values = apply_fields(Some(pin), &rest, defaults)?;
    Ok(PinConfig::from_defaults(pin, &values))
}

/// Resolve a template plus per-pin overrides into a pin table.
///
/// Pure: the same inputs always produce the same table.
pub fn resolve<S: AsRef<str>>(
    template: &str,
    overrides: &[S],
) -> Result<BTreeMap<u16, PinConfig>, ConfigError> {
    let defaults = resolve_template(template)?;
    let mut table = BTreeMap::new();
    for spec in overrides {
        let cfg = resolve_pin(spec.as_ref(), &defaults)?;
        if table.contains_key(&cfg.pin) {
            return Err(ConfigError::DuplicatePin(cfg.pin));
        }
        table.insert(cfg.pin, cfg);
    }
    Ok(table)
}

/// Overlay the non-empty entries of `fields` (name onwards) on `base`.
fn apply_fields(
    pin: Option<u16>,
    fields: &[&str],
    base: &PinDefaults,
) -> Result<PinDefaults, ConfigError> {
    if fields.len() > Field::TEMPLATE_ORDER.len() {
        return Err(ConfigError::TooManyFields {
            pin,
            count: fields.len() + usize::from(pin.is_some()),
        });
    }

    let mut out = base.clone();
    for (field, raw) in Field::TEMPLATE_ORDER.iter().copied().zip(fields.iter().copied()) {
        if raw.is_empty() {
            continue;
        }
        let invalid = || ConfigError::InvalidField {
            pin,
            field,
            value: raw.to_owned(),
        };
        match field {
            Field::Name => out.name = label(pin, field, raw)?,
            Field::Mode => out.mode = PinMode::parse(raw).ok_or_else(invalid)?,
            Field::Strategy => out.strategy = Strategy::parse(raw).ok_or_else(invalid)?,
            Field::Trigger => out.trigger = Trigger::parse(raw).ok_or_else(invalid)?,
            Field::Frequency => out.frequency = positive(raw).ok_or_else(invalid)?,
            Field::Unit => out.unit = label(pin, field, raw)?,
            Field::Pin => unreachable!("pin is parsed before the remaining fields"),
        }
    }
    Ok(out)
}

fn label(pin: Option<u16>, field: Field, raw: &str) -> Result<Label, ConfigError> {
    Label::try_from(raw).map_err(|()| ConfigError::LabelTooLong {
        pin,
        field,
        value: raw.to_owned(),
    })
}

fn positive(raw: &str) -> Option<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

// ---------------------------------------------------------------------------
// Runtime settings
// ---------------------------------------------------------------------------

/// How reported events are written by the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON object per line on stdout.
    #[default]
    Json,
    /// One `info` log line per event.
    Log,
}

/// Runtime settings for the observer binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObserverConfig {
    /// Template applied to every pin.
    pub template: String,
    /// Per-pin override strings.
    pub pins: Vec<String>,
    /// Poll tick interval (milliseconds); debounced pins flush once per tick.
    pub poll_interval_ms: u32,
    /// Output format for reported events.
    pub format: OutputFormat,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            template: String::new(),
            pins: Vec::new(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            format: OutputFormat::Json,
        }
    }
}

impl ObserverConfig {
    pub const ENV_TEMPLATE: &'static str = "PINPULSE_TEMPLATE";
    pub const ENV_PINS: &'static str = "PINPULSE_PINS";
    pub const ENV_POLL_MS: &'static str = "PINPULSE_POLL_MS";
    pub const ENV_FORMAT: &'static str = "PINPULSE_FORMAT";

    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through `lookup`, falling back to [`Default`] for
    /// unset keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();

        if let Some(template) = lookup(Self::ENV_TEMPLATE) {
            cfg.template = template;
        }
        if let Some(pins) = lookup(Self::ENV_PINS) {
            cfg.pins = pins
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect();
        }
        if let Some(raw) = lookup(Self::ENV_POLL_MS) {
            cfg.poll_interval_ms = raw
                .trim()
                .parse()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or(ConfigError::InvalidSetting {
                    key: Self::ENV_POLL_MS,
                    value: raw.clone(),
                })?;
        }
        if let Some(raw) = lookup(Self::ENV_FORMAT) {
            cfg.format = match raw.trim() {
                "json" => OutputFormat::Json,
                "log" => OutputFormat::Log,
                _ => {
                    return Err(ConfigError::InvalidSetting {
                        key: Self::ENV_FORMAT,
                        value: raw,
                    });
                }
            };
        }
        Ok(cfg)
    }

    /// Resolve the template and pin overrides held by this config.
    pub fn resolve_pins(&self) -> Result<BTreeMap<u16, PinConfig>, ConfigError> {
        resolve(&self.template, self.pins.as_slice())
    }
}
