//! Example showing how to enumerate connected card readers

use cardhost_core::SessionManager;
use cardhost_transport_pcsc::PcscHost;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let manager = SessionManager::new(PcscHost::new()?);

    let readers = manager.list_readers()?;
    if readers.is_empty() {
        println!("No readers attached");
        return Ok(());
    }

    println!("Found {} reader(s):", readers.len());
    for (i, reader) in readers.iter().enumerate() {
        println!("{}. Reader: {}", i + 1, reader.name());
        if reader.card_present() {
            println!("   Card present");
        } else {
            println!("   No card present");
        }
    }

    Ok(())
}
