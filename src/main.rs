fn main() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Warn);
    }

    if let Err(err) = svg_canvas::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// A simple stderr logger.
static LOGGER: SimpleLogger = SimpleLogger;
struct SimpleLogger;
impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let target = if !record.target().is_empty() {
                record.target()
            } else {
                record.module_path().unwrap_or_default()
            };

            let args = record.args();
            match record.level() {
                log::Level::Error => eprintln!("Error (in {}): {}", target, args),
                log::Level::Warn => eprintln!("Warning (in {}): {}", target, args),
                log::Level::Info => eprintln!("Info (in {}): {}", target, args),
                log::Level::Debug => eprintln!("Debug (in {}): {}", target, args),
                log::Level::Trace => eprintln!("Trace (in {}): {}", target, args),
            }
        }
    }

    fn flush(&self) {}
}
