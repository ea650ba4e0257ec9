use std::fmt;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Sink for diagnostics produced during compilation. The lexer receives a
/// logger explicitly; there is no process-wide log.
pub trait Logger {
    fn message(&mut self, severity: Severity, text: &str);
}

impl<L: Logger + ?Sized> Logger for &mut L {
    fn message(&mut self, severity: Severity, text: &str) {
        (**self).message(severity, text)
    }
}

/// A logger that buffers everything written to it, for programmatic
/// inspection.
#[derive(Debug, Default)]
pub struct BufLog {
    entries: Vec<(Severity, String)>,
}

impl BufLog {
    pub fn new() -> Self {
        BufLog::default()
    }

    pub fn entries(&self) -> &[(Severity, String)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.entries
            .iter()
            .any(|(severity, _)| *severity == Severity::Error)
    }
}

impl Logger for BufLog {
    fn message(&mut self, severity: Severity, text: &str) {
        self.entries.push((severity, text.to_string()));
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn buf_log_records_messages_in_order() {
        let mut log = BufLog::new();
        assert!(log.is_empty());
        assert!(!log.has_errors());

        log.message(Severity::Warning, "first");
        log.message(Severity::Error, "second");

        assert_eq!(
            log.entries(),
            &[
                (Severity::Warning, "first".to_string()),
                (Severity::Error, "second".to_string()),
            ]
        );
        assert!(log.has_errors());
    }
}
