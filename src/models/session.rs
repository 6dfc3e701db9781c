use chrono::NaiveDate;

/// A validated booking date: the literal text the user typed, which is
/// also the key stored bookings are grouped under, plus the calendar day
/// it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDate {
    pub key: String,
    pub day: NaiveDate,
}

/// Where a conversation currently stands. Data collected so far travels
/// inside the variant, so a step can never observe half-filled state from
/// an earlier flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogueStep {
    Idle,
    AwaitingDate,
    AwaitingTime { date: BookingDate },
    AwaitingName { date: BookingDate, time: String },
}

impl DialogueStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            DialogueStep::Idle => "idle",
            DialogueStep::AwaitingDate => "awaiting_date",
            DialogueStep::AwaitingTime { .. } => "awaiting_time",
            DialogueStep::AwaitingName { .. } => "awaiting_name",
        }
    }
}
