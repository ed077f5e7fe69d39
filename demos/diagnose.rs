//! Lists HID devices and the channels of every game controller among them.
//!
//! `cargo run --example diagnose --features hid`

use hidapi::HidApi;
use rawpad::backends::hid::{accept_device, HidSource};
use rawpad::{DeviceSession, EventSource, SessionConfig, SourceEvent};

fn main() {
    let api = HidApi::new().expect("init hidapi");
    let config = SessionConfig::default();

    for info in api.device_list() {
        let accepted = accept_device(info.usage_page(), info.usage());
        println!(
            "VID:PID={:04x}:{:04x} up=0x{:02x} u=0x{:02x} prod={:?} {}",
            info.vendor_id(),
            info.product_id(),
            info.usage_page(),
            info.usage(),
            info.product_string(),
            if accepted { "[controller]" } else { "" }
        );
        if !accepted {
            continue;
        }

        let attach = HidSource::open(&api, info).and_then(|mut source| source.next_event());
        let session = match attach {
            Ok(Some(SourceEvent::Attach(event))) => DeviceSession::attach(event, &config),
            Ok(_) => continue,
            Err(e) => {
                println!("  unusable: {e}");
                continue;
            }
        };
        match session {
            Ok(session) => {
                for ch in session.describe() {
                    println!(
                        "  {:?} #{:02} name={:?} up=0x{:02x} u=0x{:02x}",
                        ch.kind, ch.idx, ch.name, ch.usage_page, ch.usage
                    );
                }
            }
            Err(e) => println!("  catalog rejected: {e}"),
        }
    }
}
