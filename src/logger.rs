use std::io::Write;
use chrono::Local;
use env_logger::{Builder, Target};
use log::LevelFilter;

// Parser and transport crates chatter at debug level on every page.
const QUIET_MODULES: [&str; 4] = ["html5ever", "selectors", "reqwest", "hyper"];

/// Logs at `Info` to stderr, keeping stdout free for command output.
pub fn init() {
    init_with_level(LevelFilter::Info);
}

/// `RUST_LOG`, when set, overrides `level`. Safe to call more than once.
pub fn init_with_level(level: LevelFilter) {
    let mut builder = Builder::new();
    builder
        .target(Target::Stderr)
        .format(|buf, record| {
            writeln!(buf,
                "{} [{}] {} - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .filter(None, level);
    for module in QUIET_MODULES {
        builder.filter(Some(module), LevelFilter::Warn);
    }
    builder.parse_default_env();

    if builder.try_init().is_ok() {
        log::debug!("Logger initialized at {}", level);
    }
}
