//! CSA Round Trip Example
//!
//! Builds a Common Service Area block the way a fare gate would after a tap,
//! serializes it to the 96 bytes written to the card, then parses it back:
//! - General block with version and language
//! - Validation record for the latest tap
//! - History with the previous taps, newest first
//! - JSON snapshot of the raw block

use openloop::{
    timestamp, BlockSnapshot, CsaContainer, EffectiveDate, Language, Terminal, TxnStatus,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== CSA Round Trip Example ===\n");

    let effective_date = EffectiveDate::from_minutes(28_399_680);
    let tap_time = timestamp::parse_utc("2025-01-01 08:30:00", timestamp::DEFAULT_DATETIME_FORMAT)?;

    let mut terminal = Terminal::new();
    terminal.set_acquirer_id(10);
    terminal.set_operator_id(1000);
    terminal.set_terminal_id("ABCDEF")?;

    let mut csa = CsaContainer::new(effective_date);
    csa.general_mut().set_version(1, 2, 3)?;
    csa.general_mut().set_language(Language::English)?;

    let validation = csa.validation_mut();
    validation.set_terminal(terminal);
    validation.set_date_and_time(tap_time)?;
    validation.set_fare_amount(1500);
    validation.set_txn_status(TxnStatus::Entry)?;

    let mut balance = 20_000;
    for (sequence, hours_ago) in [(101u16, 48i64), (102, 24), (103, 2)] {
        let mut entry = csa.new_log_entry();
        entry.set_terminal(terminal);
        entry.set_date_and_time(timestamp::add_hours(tap_time, -hours_ago)?)?;
        entry.set_txn_sequence(sequence);
        entry.set_txn_amount(1500);
        entry.set_card_balance(balance)?;
        csa.history_mut().add(entry)?;
        balance -= 1500;
    }

    let bytes = csa.to_bytes();
    println!("Encoded block ({} bytes):", bytes.len());
    for row in bytes.chunks(16) {
        println!("  {}", hex::encode_upper(row));
    }

    let parsed = CsaContainer::parse(&bytes, effective_date)?;
    println!("\nParsed:");
    println!("  Version: {}", parsed.general().version_string());
    println!("  Language: {}", parsed.general().language().name());
    println!(
        "  Last tap: {} at terminal {}, fare {}",
        timestamp::format_utc(parsed.validation().date_and_time()?, timestamp::DEFAULT_DATETIME_FORMAT)?,
        parsed.validation().terminal().terminal_id(),
        parsed.validation().fare_amount()
    );
    for entry in parsed.history().entries() {
        println!(
            "  #{} {} balance {}",
            entry.txn_sequence(),
            timestamp::format_utc(entry.date_and_time()?, timestamp::DEFAULT_DATETIME_FORMAT)?,
            entry.card_balance()
        );
    }
    println!("  Round trip equal: {}", parsed == csa);

    let snapshot = BlockSnapshot::from_csa(&parsed);
    println!("\nSnapshot:\n{}", snapshot.to_json_pretty()?);

    Ok(())
}
