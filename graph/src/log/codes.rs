use std::fmt;

/// Codes attached to log entries that signal a condition operators may
/// want to alert on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogCode {
    IndexingStartFailure,
    IndexingFailure,
    BlockProcessed,
    BlockStreamError,
}

impl fmt::Display for LogCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let value = match self {
            LogCode::IndexingStartFailure => "IndexingStartFailure",
            LogCode::IndexingFailure => "IndexingFailure",
            LogCode::BlockProcessed => "BlockProcessed",
            LogCode::BlockStreamError => "BlockStreamError",
        };
        write!(f, "{}", value)
    }
}

impl slog::Value for LogCode {
    fn serialize(
        &self,
        _rec: &slog::Record,
        key: slog::Key,
        serializer: &mut dyn slog::Serializer,
    ) -> slog::Result {
        serializer.emit_str(key, format!("{}", self).as_str())
    }
}
