//! Narrative text, timings and counts.
//!
//! `Default` is the built-in greeting. A page can override any subset by
//! embedding JSON in `<script type="application/json" id="greeting-config">`.

use serde::{Deserialize, Serialize};

use crate::curve::HeartVariant;
use crate::error::GreetingResult;
use crate::scene::Crossfade;

/// Element id of the optional inline override.
pub const CONFIG_ELEMENT_ID: &str = "greeting-config";

/// Style of a log line; doubles as its CSS class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogTag {
    Info,
    Success,
    Highlight,
    Warning,
    Sender,
    Priority,
}

impl LogTag {
    pub fn class(self) -> &'static str {
        match self {
            LogTag::Info => "info",
            LogTag::Success => "success",
            LogTag::Highlight => "highlight",
            LogTag::Warning => "warning",
            LogTag::Sender => "sender",
            LogTag::Priority => "priority",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogLine {
    pub text: String,
    pub tag: LogTag,
    /// Pause after the line is shown.
    #[serde(default)]
    pub delay_ms: u32,
}

impl LogLine {
    pub fn new(text: impl Into<String>, tag: LogTag, delay_ms: u32) -> Self {
        Self {
            text: text.into(),
            tag,
            delay_ms,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    pub fade_in_delay_ms: u32,
    pub fade_out_ms: u32,
    /// Pause between the last boot line and the auth panel.
    pub boot_settle_ms: u32,
    /// Simulated face scan after a photo arrives.
    pub scan_ms: u32,
    /// How long the "authenticated" banner stays before the journey.
    pub auth_hold_ms: u32,
    pub char_ms: u32,
    /// Pause between the finished message and its continue button.
    pub message_seal_ms: u32,
    pub heart_start_delay_ms: u32,
    pub explanation_step_ms: u32,
    pub overlay_extra_ms: u32,
    pub flame_stagger_ms: u32,
    pub finale_delay_ms: u32,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            fade_in_delay_ms: 50,
            fade_out_ms: 800,
            boot_settle_ms: 500,
            scan_ms: 3000,
            auth_hold_ms: 2500,
            char_ms: 40,
            message_seal_ms: 1000,
            heart_start_delay_ms: 500,
            explanation_step_ms: 800,
            overlay_extra_ms: 1000,
            flame_stagger_ms: 200,
            finale_delay_ms: 2000,
        }
    }
}

impl Timings {
    pub fn crossfade(&self) -> Crossfade {
        Crossfade {
            fade_in_delay_ms: self.fade_in_delay_ms,
            fade_out_ms: self.fade_out_ms,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleCounts {
    pub dust: usize,
    pub confetti: usize,
    pub burst: usize,
}

impl Default for ParticleCounts {
    fn default() -> Self {
        Self {
            dust: 100,
            confetti: 150,
            burst: 30,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GreetingConfig {
    pub boot_lines: Vec<LogLine>,
    pub header_lines: Vec<LogLine>,
    pub message: String,
    pub heart_variant: HeartVariant,
    pub particles: ParticleCounts,
    pub timings: Timings,
}

impl Default for GreetingConfig {
    fn default() -> Self {
        Self {
            boot_lines: vec![
                LogLine::new("> Initializing Birthday Protocol...", LogTag::Info, 500),
                LogLine::new("> Loading Emotional Modules... [OK]", LogTag::Success, 800),
                LogLine::new("> Connecting to Heart Database...", LogTag::Info, 600),
                LogLine::new("> Friendship Level: MAXIMUM", LogTag::Highlight, 700),
                LogLine::new("> Loading Celebration Assets...", LogTag::Info, 500),
                LogLine::new("> Happiness.dll loaded successfully", LogTag::Success, 600),
                LogLine::new("> Preparing special memories...", LogTag::Info, 800),
                LogLine::new("> Authenticating Subject...", LogTag::Warning, 1000),
            ],
            header_lines: vec![
                LogLine::new("[LOG 01] Sender: Rahman", LogTag::Sender, 500),
                LogLine::new("[LOG 02] Priority: Heartfelt", LogTag::Priority, 500),
                LogLine::new("[LOG 03] Message:", LogTag::Info, 500),
            ],
            message: "Happy Birthday Layal 🤍\n\
                      You are one of the kindest, brightest souls I know.\n\
                      May this year bring you joy, strength, and beautiful surprises."
                .to_owned(),
            heart_variant: HeartVariant::default(),
            particles: ParticleCounts::default(),
            timings: Timings::default(),
        }
    }
}

impl GreetingConfig {
    pub fn from_json(json: &str) -> GreetingResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses an override if there is one; any failure falls back to the
    /// built-in greeting.
    pub fn load_or_default(json: Option<&str>) -> Self {
        let Some(json) = json.map(str::trim).filter(|j| !j.is_empty()) else {
            return Self::default();
        };
        match Self::from_json(json) {
            Ok(config) => {
                log::info!("loaded greeting config override");
                config
            }
            Err(err) => {
                log::warn!("ignoring greeting config: {err}");
                Self::default()
            }
        }
    }
}
