//! Example connecting to the first reader holding a card and issuing a
//! SELECT with an empty AID
//!
//! Run with `RUST_LOG=trace` to see the raw exchange.

use cardhost_core::SessionManager;
use cardhost_core::apdu::{self, StatusWord};
use cardhost_transport_pcsc::PcscHost;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut manager = SessionManager::new(PcscHost::new()?);

    let readers = manager.list_readers()?;
    let Some(reader) = readers.iter().find(|reader| reader.card_present()) else {
        println!("No reader with a card");
        return Ok(());
    };
    let name = reader.name().to_string();

    println!("Connecting to reader: {name}");
    manager.connect(&name)?;

    let response = manager.transmit(&apdu::select_command(&[]))?;
    match StatusWord::from_response(&response) {
        Some(sw) if sw.is_success() => {
            println!(
                "SELECT ok, {} data byte(s)",
                apdu::response_data(&response).len()
            );
        }
        Some(sw) => println!("SELECT returned {sw}"),
        None => println!("Response too short: {}", hex::encode_upper(&response)),
    }

    manager.disconnect()?;
    Ok(())
}
