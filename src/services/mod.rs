pub mod assistant;
pub mod catalog;
pub mod clock;
pub mod directory;
pub mod messaging;
pub mod schedule;
pub mod scripture;
pub mod sqlite;
