pub mod booking;
pub mod profile;
pub mod session;

pub use booking::{Booking, BookingStatus};
pub use profile::{BotProfile, Slot, SlotCatalog};
pub use session::{BookingDate, DialogueStep};
