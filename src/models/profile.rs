use anyhow::Context;
use serde::{Deserialize, Serialize};

static DEFAULT_PROFILE: &str = include_str!("../profile_default.json");

/// One bookable time of day, addressed in chat by a single letter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub label: char,
    pub time: String,
}

/// The fixed daily slot alphabet. Order is the order slots are offered in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotCatalog {
    slots: Vec<Slot>,
}

impl SlotCatalog {
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn contains(&self, label: char) -> bool {
        self.slots.iter().any(|s| s.label == label)
    }

    pub fn time_for(&self, label: char) -> Option<&str> {
        self.slots
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.time.as_str())
    }

    /// Reverse lookup used when mapping stored rows back onto labels.
    pub fn label_for(&self, time: &str) -> Option<char> {
        self.slots.iter().find(|s| s.time == time).map(|s| s.label)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Per-deployment personality and vocabulary of the assistant: business
/// identity, greeting keywords, month names for date parsing, the slot
/// catalog and the canned informational texts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotProfile {
    pub business_name: String,
    pub operator_chat_id: String,
    pub greetings: Vec<String>,
    pub months: Vec<String>,
    #[serde(rename = "slots")]
    pub catalog: SlotCatalog,
    pub promotions_text: String,
    pub address_text: String,
    pub cancel_text: String,
    pub faq_text: String,
}

impl BotProfile {
    /// Loads the profile from `path`, falling back to the embedded default
    /// when no file is configured.
    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        match path {
            Some(p) => {
                let raw = std::fs::read_to_string(p)
                    .with_context(|| format!("failed to read profile file: {p}"))?;
                Self::from_json(&raw)
            }
            None => Self::from_json(DEFAULT_PROFILE),
        }
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let mut profile: BotProfile =
            serde_json::from_str(raw).context("invalid profile JSON")?;

        if profile.months.len() != 12 {
            anyhow::bail!(
                "profile must list exactly 12 month names, got {}",
                profile.months.len()
            );
        }
        if profile.months.iter().any(|m| m.trim().is_empty()) {
            anyhow::bail!("month names must not be empty");
        }
        if profile.greetings.is_empty() || profile.greetings.iter().any(|g| g.trim().is_empty()) {
            anyhow::bail!("greeting keyword set must be non-empty");
        }
        if profile.catalog.slots.is_empty() {
            anyhow::bail!("slot catalog must not be empty");
        }

        for slot in &mut profile.catalog.slots {
            if !slot.label.is_ascii_alphabetic() {
                anyhow::bail!("slot label must be a letter, got: {}", slot.label);
            }
            slot.label = slot.label.to_ascii_uppercase();
            parse_time(&slot.time)?;
        }
        for (i, slot) in profile.catalog.slots.iter().enumerate() {
            let rest = &profile.catalog.slots[i + 1..];
            if rest.iter().any(|other| other.label == slot.label) {
                anyhow::bail!("duplicate slot label: {}", slot.label);
            }
            if rest.iter().any(|other| other.time == slot.time) {
                anyhow::bail!("duplicate slot time: {}", slot.time);
            }
        }

        Ok(profile)
    }

    /// Case-insensitive full match against the configured greeting set.
    pub fn is_greeting(&self, text: &str) -> bool {
        let needle = text.to_lowercase();
        self.greetings.iter().any(|g| g.to_lowercase() == needle)
    }
}

fn parse_time(s: &str) -> anyhow::Result<()> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 {
        anyhow::bail!("invalid slot time format: {s}");
    }
    let hour: u32 = parts[0]
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid hour in slot time: {s}"))?;
    let minute: u32 = parts[1]
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid minute in slot time: {s}"))?;
    if hour > 23 || minute > 59 {
        anyhow::bail!("slot time out of range: {s}");
    }
    Ok(())
}
