mod category;
mod record;

pub use category::{CategoryCode, CodeRule};
pub use record::{Record, Roster};
