// p2p-board: command-driven bulletin board core for peer-to-peer bitcoin trades.
// validation-first architecture: nothing enters the store unchecked, and every
// mutation is durably persisted before it is reported as done.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: OwnerId, Side, Method, Unit, Premium
//   2.x  validate.rs: amount/premium parsing, note sanitization, rule aggregation
//   3.x  record.rs: TradeRecord and validated edits
//   4.x  persist.rs: atomic JSON snapshots, fsync-before-rename, backup rotation
//   5.x  config.rs: per-unit amount bounds, premium range, snapshot location
//   6.x  store.rs: record store: create/list/update/delete with staged commits
//   7.x  board.rs: sell/buy premium-sorted projection and ordinal resolution

pub mod board;
pub mod config;
pub mod persist;
pub mod record;
pub mod store;
pub mod types;
pub mod validate;

// re exports for convenience
pub use board::{resolve_display_ordinal, BoardEntry, BoardView};
pub use config::{AmountLimits, BoardConfig};
pub use persist::{PersistError, SnapshotStore};
pub use record::TradeRecord;
pub use store::{StoreError, TradeStore};
pub use types::{format_amount, Method, OwnerId, Premium, Side, Unit};
pub use validate::{sanitize_note, validate_trade_input, FieldError, ValidatedInput, ValidationFailure};
