//! Service calls with client-side checks applied before anything is sent

pub mod newsletter;
pub mod posts;
pub mod taxonomy;

pub use posts::BatchSummary;
pub use taxonomy::TermKind;
