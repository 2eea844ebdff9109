pub mod card;
pub mod config;
pub mod error;
pub mod filter;
pub mod http_client;
pub mod import;
pub mod model;
pub mod photo;
pub mod photo_cache;
pub mod roster;
pub mod state;
pub mod store;

pub use error::{PhotoError, RosterError, StoreError};
pub use model::{Field, FilterCriteria, NewPlayer, Player, PlayerFields, PlayerKey, PlayerStat};
pub use roster::{FilterOutcome, Roster};
pub use store::{RecordStore, SqliteStore};
