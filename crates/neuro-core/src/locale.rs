//! Output language and the fixed caller-facing messages.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Language every generated text is requested in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    English,
    Persian,
}

impl Locale {
    /// Language name as written into prompts
    pub fn language_name(&self) -> &'static str {
        match self {
            Locale::English => "English",
            Locale::Persian => "Persian (Farsi)",
        }
    }

    /// Appended to the transcript when a chat turn fails
    pub fn chat_fallback(&self) -> &'static str {
        match self {
            Locale::English => "Sorry, I ran into a problem processing your request. Please try again.",
            Locale::Persian => "متاسفانه در پردازش درخواست شما مشکلی پیش آمد. لطفا دوباره تلاش کنید.",
        }
    }

    pub fn profile_error(&self) -> &'static str {
        match self {
            Locale::English => {
                "An error occurred while generating the simulation. Please try again."
            }
            Locale::Persian => "خطایی در هنگام تولید شبیه‌سازی رخ داد. لطفا دوباره تلاش کنید.",
        }
    }

    pub fn scenario_error(&self) -> &'static str {
        match self {
            Locale::English => {
                "An error occurred while simulating the scenario. Please try again."
            }
            Locale::Persian => "خطایی در شبیه‌سازی سناریو رخ داد. لطفا دوباره تلاش کنید.",
        }
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Locale::English),
            "fa" | "persian" | "farsi" => Ok(Locale::Persian),
            other => Err(Error::Configuration(format!("unsupported locale: {other}"))),
        }
    }
}
