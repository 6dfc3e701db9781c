pub mod availability;
pub mod dates;
pub mod dialogue;
pub mod messaging;
pub mod session;
