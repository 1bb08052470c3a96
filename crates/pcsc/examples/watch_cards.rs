//! Example watching readers for card insertions and removals

use cardhost_transport_pcsc::{CardEvent, PcscMonitor, card_event_channel};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let monitor = PcscMonitor::new()?;
    let (sender, receiver) = card_event_channel();
    monitor.watch_channel(sender)?;

    println!("Watching for card events, press Ctrl-C to exit");
    for event in receiver {
        match event {
            CardEvent::Inserted { reader, atr } => {
                println!("Card inserted in {reader}, ATR: {}", hex::encode_upper(&atr));
            }
            CardEvent::Removed { reader } => {
                println!("Card removed from {reader}");
            }
        }
    }

    Ok(())
}
