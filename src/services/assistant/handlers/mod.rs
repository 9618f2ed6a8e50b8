//! One module per intent family. Each adds `handle_*` methods to
//! [`ChatEngine`](super::ChatEngine) that always produce a response.

pub mod birthdays;
pub mod duty;
pub mod help;
pub mod rehearsal;
pub mod scripture;
pub mod songs;
