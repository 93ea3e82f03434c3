use log::Level;

/// Initialize browser console logging once; `debug` builds log everything.
pub fn init_logging() {
    let level = if cfg!(debug_assertions) {
        Level::Debug
    } else {
        Level::Info
    };
    let _ = console_log::init_with_level(level);
}
