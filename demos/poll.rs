//! Polls the first HID game controller and prints button edges.
//!
//! `cargo run --example poll --features hid -- [config.toml]`

use hidapi::HidApi;
use rawpad::backends::hid::HidSource;
use rawpad::{InputKind, InputManager, SessionConfig};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rawpad=info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => SessionConfig::load(&path).expect("load config"),
        None => SessionConfig::default(),
    };
    let labels = config.labels();

    let api = HidApi::new().expect("init hidapi");
    let mut source = HidSource::open_first(&api).expect("open controller");
    let mut manager = InputManager::new(config).expect("valid config");

    let stats = manager
        .run(&mut source, |snapshot, edges| {
            for edge in edges {
                let (verb, button) = match *edge {
                    InputKind::ButtonPressed { button } => ("down", button),
                    InputKind::ButtonReleased { button } => ("up", button),
                };
                let name = labels
                    .label_for_button_index(usize::from(button))
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Button {button}"));
                let axes: Vec<u32> = snapshot.axes().values().map(|a| a.raw).collect();
                println!("{name:>12} {verb}   axes={axes:?}");
            }
        })
        .expect("poll");

    println!("{stats:?}");
}
