/// Sink for mapper warnings. Injected so callers can redirect or capture
/// what would otherwise go to the console.
pub trait TraceSink {
    fn write_line(&mut self, message: &str);
}

/// Production sink: writes to stdout.
pub struct ConsoleTrace;

impl TraceSink for ConsoleTrace {
    fn write_line(&mut self, message: &str) {
        println!("{message}");
    }
}

/// Collects lines instead of printing them.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct CapturingTrace {
    pub lines: Vec<String>,
}

#[cfg(test)]
impl TraceSink for CapturingTrace {
    fn write_line(&mut self, message: &str) {
        self.lines.push(message.to_string());
    }
}
