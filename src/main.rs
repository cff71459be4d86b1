//! P2P trade board simulation.
//!
//! Walks the full record lifecycle the way the chat command layer would drive
//! it: registration, board rendering, owner edits and deletes, and privileged
//! cleanup, all against a throwaway snapshot directory.

use p2p_board::*;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    println!("P2P Trade Board Core Simulation");
    println!("Validated Records, Durable Snapshots, Deterministic Board\n");

    let dir = tempfile::tempdir().expect("tempdir");
    let config = BoardConfig::with_snapshot_path(dir.path().join("trades.json"));

    scenario_1_registration(&config);
    scenario_2_board_rendering(&config);
    scenario_3_owner_management(&config);
    scenario_4_privileged_cleanup(&config);
    scenario_5_durability(&config);

    println!("\nAll simulations completed successfully.");
}

/// Validated registration, including a rejected submission.
fn scenario_1_registration(config: &BoardConfig) {
    println!("Scenario 1: Registration\n");

    let mut store = TradeStore::open(config.clone()).unwrap();
    store.delete_all().unwrap();

    let record = store
        .create(
            OwnerId(42),
            "satoshi",
            Side::Sell,
            Method::Lightning,
            Unit::Sats,
            "1,000,000",
            "1.5",
            "weekends only",
        )
        .unwrap();
    println!(
        "  registered: {} | {} | {} | premium {}",
        record.side, record.method, record.amount_display, record.premium
    );

    let err = store
        .create(
            OwnerId(7),
            "mallory",
            Side::Buy,
            Method::OnChain,
            Unit::Sats,
            "12",
            "999",
            "@everyone buy from me",
        )
        .unwrap_err();
    println!("  rejected submission:\n{}\n", indent(&err.to_string()));
}

/// Board projection: sells then buys, premium ascending.
fn scenario_2_board_rendering(config: &BoardConfig) {
    println!("Scenario 2: Board Rendering\n");

    let mut store = TradeStore::open(config.clone()).unwrap();
    store.delete_all().unwrap();
    for (owner, side, premium) in [
        (1u64, Side::Sell, "5.0"),
        (2, Side::Sell, "1.0"),
        (3, Side::Sell, "3.0"),
        (4, Side::Buy, "2.0"),
        (5, Side::Buy, "-1.0"),
    ] {
        store
            .create(
                OwnerId(owner),
                &format!("member-{owner}"),
                side,
                Method::Lightning,
                Unit::Sats,
                "2,000,000",
                premium,
                "",
            )
            .unwrap();
    }

    let board = BoardView::project(&store);
    for (i, entry) in board.display_order().enumerate() {
        println!(
            "  #{} {} | {} | {} | {}",
            i + 1,
            entry.record.side,
            entry.record.owner_name,
            entry.record.amount_display,
            entry.record.premium
        );
    }
    println!();
}

/// Owners list, edit, and delete their own records; others are rejected.
fn scenario_3_owner_management(config: &BoardConfig) {
    println!("Scenario 3: Owner Management\n");

    let mut store = TradeStore::open(config.clone()).unwrap();
    let mine = store.list_by_owner(OwnerId(2));
    let (position, _) = mine[0];

    let updated = store
        .update_owned(OwnerId(2), position, Method::OnChain, "3,000,000", "0.5", "fast settle")
        .unwrap();
    println!(
        "  owner 2 edited: {} | {} | premium {}",
        updated.method, updated.amount_display, updated.premium
    );

    match store.delete_owned(OwnerId(99), position) {
        Err(StoreError::NotFound) => println!("  owner 99 delete rejected: not their record"),
        other => println!("  unexpected: {other:?}"),
    }

    let removed = store.delete_owned(OwnerId(2), position).unwrap();
    println!("  owner 2 deleted their {} record\n", removed.side);
}

/// Privileged targeted and bulk deletion via the board projection.
fn scenario_4_privileged_cleanup(config: &BoardConfig) {
    println!("Scenario 4: Privileged Cleanup\n");

    let mut store = TradeStore::open(config.clone()).unwrap();
    println!("  {} records on the board", store.len());

    // helper deletes display #1 (the cheapest sell)
    if let Some(position) = resolve_display_ordinal(&store, 1) {
        let removed = store.delete_at(position).unwrap();
        println!(
            "  force-deleted #1: {} | {} | {}",
            removed.side, removed.owner_name, removed.premium
        );
    }

    let count = store.delete_all_by_owner(OwnerId(4)).unwrap();
    println!("  deleted {count} record(s) owned by member-4");

    let count = store.delete_all().unwrap();
    println!("  cleared the board: {count} record(s) removed\n");
}

/// Snapshots survive reopen; backups accumulate up to the retention cap.
fn scenario_5_durability(config: &BoardConfig) {
    println!("Scenario 5: Durability\n");

    let mut store = TradeStore::open(config.clone()).unwrap();
    for owner in 1..=5u64 {
        store
            .create(
                OwnerId(owner),
                &format!("member-{owner}"),
                Side::Sell,
                Method::OnChain,
                Unit::Won,
                "100,000",
                "0",
                "",
            )
            .unwrap();
    }
    store.close().unwrap();

    let reopened = TradeStore::open(config.clone()).unwrap();
    println!("  reopened store holds {} records", reopened.len());

    let backup_dir = config
        .snapshot_path
        .parent()
        .unwrap()
        .join("backups");
    let backups = std::fs::read_dir(&backup_dir)
        .map(|entries| entries.filter_map(|e| e.ok()).count())
        .unwrap_or(0);
    println!("  {backups} backup snapshot(s) retained (cap {})", config.backup_retention);
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("    {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
