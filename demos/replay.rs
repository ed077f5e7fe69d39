//! Replays a scripted button sequence against the reference gamepad.
//!
//! `RUST_LOG=rawpad=debug cargo run --example replay`

use rawpad::{
    InputKind, InputManager, ReferenceReport, ReportDescriptor, ScriptedSource, SessionConfig,
    TraceMode, REFERENCE_GAMEPAD,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rawpad=info")),
        )
        .init();

    let descriptor = ReportDescriptor::parse(REFERENCE_GAMEPAD).expect("reference descriptor");
    let mut source = ScriptedSource::new("Reference Gamepad");
    source.attach(descriptor);

    let idle = ReferenceReport::centered();
    let script = [
        idle,
        idle.with_buttons(0b1001), // A + Y
        idle.with_buttons(0b1000), // A released
        ReferenceReport {
            left_x: 0xFFFF,
            hat: 3,
            ..idle.with_buttons(0b1000)
        },
        idle,
    ];
    for report in &script {
        source.report(&report.to_bytes());
    }
    // a truncated report is discarded without touching the snapshot
    source.report(&[0x01]);

    let config = SessionConfig::default().with_trace(TraceMode::Text);
    let labels = config.labels();
    let mut manager = InputManager::new(config).expect("valid config");

    let stats = manager
        .run(&mut source, |snapshot, edges| {
            for edge in edges {
                let (verb, button) = match *edge {
                    InputKind::ButtonPressed { button } => ("pressed", button),
                    InputKind::ButtonReleased { button } => ("released", button),
                };
                let name = labels
                    .label_for_button_index(usize::from(button))
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("#{button}"));
                println!("{name} {verb}");
            }
            println!("down: {:?}", snapshot.buttons().pressed().collect::<Vec<_>>());
        })
        .expect("replay");

    println!(
        "{} cycles, {} discarded, {} ignored",
        stats.cycles, stats.discarded, stats.ignored
    );
}
