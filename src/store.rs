// 6.0 store.rs: the record store. one flat, order-preserving collection of
// trade records with validated creation, position-scoped edit/delete, and
// bulk deletion. every mutation is staged, persisted, then swapped into
// memory, so a failed write leaves memory and disk agreeing on the old state.
//
// identity and privilege are the caller's concern. the store enforces
// structural invariants only: bounds, position validity, and the ownership
// re-check of the *_owned operations.

use tracing::debug;

use crate::config::BoardConfig;
use crate::persist::{PersistError, SnapshotStore};
use crate::record::TradeRecord;
use crate::types::{Method, OwnerId, Side, Unit};
use crate::validate::{validate_trade_input, ValidationFailure};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    // the position was stale, out of range, or owned by someone else
    #[error("trade not found")]
    NotFound,

    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    #[error("persistence failed: {0}")]
    Persist(#[from] PersistError),
}

/** 6.1: main store struct. all live state and the injected snapshot writer */
#[derive(Debug)]
pub struct TradeStore {
    config: BoardConfig,
    snapshot: SnapshotStore,
    records: Vec<TradeRecord>,
}

impl TradeStore {
    /// Opens the store from the configured snapshot. Missing snapshot means
    /// an empty board; a corrupt one refuses to start.
    pub fn open(config: BoardConfig) -> Result<Self, StoreError> {
        let snapshot = SnapshotStore::new(&config.snapshot_path, config.backup_retention);
        let records = snapshot.load()?;
        debug!(records = records.len(), "store opened");
        Ok(Self {
            config,
            snapshot,
            records,
        })
    }

    pub fn records(&self) -> &[TradeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Final flush at process stop. The collection is already persisted after
    /// every mutation; this re-commits the current state defensively.
    pub fn close(self) -> Result<(), StoreError> {
        self.snapshot.save(&self.records)?;
        Ok(())
    }

    // 6.2: validated creation. append-last, persist, return the new record.
    // on validation failure nothing is mutated and nothing is written.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        &mut self,
        owner_id: OwnerId,
        owner_name: &str,
        side: Side,
        method: Method,
        unit: Unit,
        raw_amount: &str,
        raw_premium: &str,
        raw_note: &str,
    ) -> Result<TradeRecord, StoreError> {
        let input = validate_trade_input(raw_amount, raw_premium, raw_note, unit, &self.config)?;
        let record = TradeRecord::new(owner_id, owner_name, side, method, unit, input);

        let mut staged = self.records.clone();
        staged.push(record.clone());
        self.commit(staged)?;
        debug!(owner = %owner_id, %side, "trade created");
        Ok(record)
    }

    /// All records belonging to `owner_id`, paired with their store positions,
    /// in store order. Pure read.
    pub fn list_by_owner(&self, owner_id: OwnerId) -> Vec<(usize, &TradeRecord)> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.owner_id == owner_id)
            .collect()
    }

    // 6.3: validated edit at a store position. re-validates against the
    // record's existing unit; owner, side, and unit never change.
    pub fn update(
        &mut self,
        position: usize,
        method: Method,
        raw_amount: &str,
        raw_premium: &str,
        raw_note: &str,
    ) -> Result<TradeRecord, StoreError> {
        let unit = self
            .records
            .get(position)
            .ok_or(StoreError::NotFound)?
            .unit;
        let input = validate_trade_input(raw_amount, raw_premium, raw_note, unit, &self.config)?;

        let mut staged = self.records.clone();
        staged[position].apply_edit(method, input);
        let updated = staged[position].clone();
        self.commit(staged)?;
        debug!(position, "trade updated");
        Ok(updated)
    }

    /// Like [`update`](Self::update), but re-checks at mutation time that the
    /// record at `position` still belongs to `owner_id`. Positions handed out
    /// earlier may be stale; a mismatch is `NotFound`, never a silent edit of
    /// someone else's record.
    pub fn update_owned(
        &mut self,
        owner_id: OwnerId,
        position: usize,
        method: Method,
        raw_amount: &str,
        raw_premium: &str,
        raw_note: &str,
    ) -> Result<TradeRecord, StoreError> {
        self.check_owner(owner_id, position)?;
        self.update(position, method, raw_amount, raw_premium, raw_note)
    }

    // 6.4: removes and returns the record at a store position.
    pub fn delete_at(&mut self, position: usize) -> Result<TradeRecord, StoreError> {
        if position >= self.records.len() {
            return Err(StoreError::NotFound);
        }
        let mut staged = self.records.clone();
        let removed = staged.remove(position);
        self.commit(staged)?;
        debug!(position, owner = %removed.owner_id, "trade deleted");
        Ok(removed)
    }

    /// Ownership-re-checked variant of [`delete_at`](Self::delete_at).
    pub fn delete_owned(
        &mut self,
        owner_id: OwnerId,
        position: usize,
    ) -> Result<TradeRecord, StoreError> {
        self.check_owner(owner_id, position)?;
        self.delete_at(position)
    }

    /// Empties the board. Returns the prior count; an already-empty board is
    /// a successful no-op with no write.
    pub fn delete_all(&mut self) -> Result<usize, StoreError> {
        let count = self.records.len();
        if count == 0 {
            return Ok(0);
        }
        self.commit(Vec::new())?;
        debug!(count, "all trades deleted");
        Ok(count)
    }

    /// Removes every record owned by `owner_id`, persisting once. Returns the
    /// number removed; 0 means nothing matched and nothing was written.
    pub fn delete_all_by_owner(&mut self, owner_id: OwnerId) -> Result<usize, StoreError> {
        let staged: Vec<TradeRecord> = self
            .records
            .iter()
            .filter(|r| r.owner_id != owner_id)
            .cloned()
            .collect();
        let count = self.records.len() - staged.len();
        if count == 0 {
            return Ok(0);
        }
        self.commit(staged)?;
        debug!(count, owner = %owner_id, "owner trades deleted");
        Ok(count)
    }

    fn check_owner(&self, owner_id: OwnerId, position: usize) -> Result<(), StoreError> {
        match self.records.get(position) {
            Some(record) if record.owner_id == owner_id => Ok(()),
            _ => Err(StoreError::NotFound),
        }
    }

    // persist the staged collection, then swap it in. a write failure
    // propagates and the live collection is untouched.
    fn commit(&mut self, staged: Vec<TradeRecord>) -> Result<(), StoreError> {
        self.snapshot.save(&staged)?;
        self.records = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn open_store(dir: &tempfile::TempDir) -> TradeStore {
        let config = BoardConfig::with_snapshot_path(dir.path().join("trades.json"));
        TradeStore::open(config).unwrap()
    }

    fn seed(store: &mut TradeStore, owner: u64, side: Side, premium: &str) -> TradeRecord {
        store
            .create(
                OwnerId(owner),
                &format!("member-{owner}"),
                side,
                Method::Lightning,
                Unit::Sats,
                "1,000,000",
                premium,
                "",
            )
            .unwrap()
    }

    #[test]
    fn create_appends_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(&dir);

        let record = seed(&mut store, 42, Side::Sell, "1.5");
        assert_eq!(record.amount, 1_000_000);
        assert_eq!(record.amount_display, "1,000,000 sats");
        assert_eq!(record.premium.value(), dec!(1.5));
        assert_eq!(store.len(), 1);

        // fresh open sees the committed record
        let reopened = open_store(&dir);
        assert_eq!(reopened.records(), store.records());
    }

    #[test]
    fn create_rejects_invalid_without_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(&dir);

        let err = store
            .create(
                OwnerId(1),
                "bob",
                Side::Buy,
                Method::OnChain,
                Unit::Sats,
                "12",
                "999",
                "",
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(store.is_empty());
        // no snapshot written either
        assert!(!dir.path().join("trades.json").exists());
    }

    #[test]
    fn list_by_owner_preserves_store_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(&dir);
        seed(&mut store, 1, Side::Sell, "5");
        seed(&mut store, 2, Side::Buy, "1");
        seed(&mut store, 1, Side::Buy, "3");

        let mine = store.list_by_owner(OwnerId(1));
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].0, 0);
        assert_eq!(mine[1].0, 2);
    }

    #[test]
    fn update_reuses_original_unit() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(&dir);
        store
            .create(
                OwnerId(1),
                "bob",
                Side::Sell,
                Method::Lightning,
                Unit::Won,
                "50,000",
                "2",
                "",
            )
            .unwrap();

        let updated = store
            .update(0, Method::OnChain, "75,000", "-1.5", "note")
            .unwrap();
        assert_eq!(updated.unit, Unit::Won);
        assert_eq!(updated.amount_display, "75,000 won");
        assert_eq!(updated.method, Method::OnChain);
        assert_eq!(updated.side, Side::Sell);
    }

    #[test]
    fn update_out_of_range_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(&dir);
        let err = store.update(0, Method::OnChain, "5000", "0", "").unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn owned_operations_reject_other_actors() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(&dir);
        seed(&mut store, 1, Side::Sell, "1");

        let err = store
            .update_owned(OwnerId(2), 0, Method::OnChain, "5000", "0", "")
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
        let err = store.delete_owned(OwnerId(2), 0).unwrap_err();
        assert!(matches!(err, StoreError::NotFound));

        // store unchanged
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].premium.value(), dec!(1));

        // the actual owner succeeds
        store.delete_owned(OwnerId(1), 0).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn stale_position_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(&dir);
        seed(&mut store, 1, Side::Sell, "1");
        seed(&mut store, 2, Side::Sell, "2");

        // position 1 was owner 2's record; owner 2 deletes it, then retries
        store.delete_owned(OwnerId(2), 1).unwrap();
        let err = store.delete_owned(OwnerId(2), 1).unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn delete_all_reports_prior_count() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(&dir);
        assert_eq!(store.delete_all().unwrap(), 0);

        seed(&mut store, 1, Side::Sell, "1");
        seed(&mut store, 2, Side::Buy, "2");
        assert_eq!(store.delete_all().unwrap(), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn delete_all_by_owner_removes_only_theirs() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(&dir);
        seed(&mut store, 1, Side::Sell, "1");
        seed(&mut store, 2, Side::Buy, "2");
        seed(&mut store, 1, Side::Buy, "3");

        assert_eq!(store.delete_all_by_owner(OwnerId(1)).unwrap(), 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].owner_id, OwnerId(2));

        assert_eq!(store.delete_all_by_owner(OwnerId(99)).unwrap(), 0);
    }
}
