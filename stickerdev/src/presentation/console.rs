use sticker_core::report::Reporter;

/// Prints user-facing messages to stderr, keeping stdout for listings.
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&mut self, message: &str) {
        eprintln!("{message}");
    }
}
