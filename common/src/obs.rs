use std::{io::Write, sync::Mutex};

use slog::{o, Drain, Level};

/// Assemble the root logger for a remkfs binary: one JSON object per log line,
/// serialized through a mutex onto the given writer. Records below `level` are
/// dropped.
pub fn assemble_logger<W: Write + Send + 'static>(w: W, level: Level) -> slog::Logger {
	let drain = Mutex::new(slog_json::Json::default(w)).fuse();
	slog::Logger::root(drain.filter_level(level).fuse(), o!())
}
