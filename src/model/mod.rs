mod competition;
mod record;

pub use competition::*;
pub use record::*;
