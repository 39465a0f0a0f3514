// AgentView - core/event_stream.rs
//
// Line-oriented parser for the `text/event-stream` (Server-Sent Events) wire
// format used by the backend's live log endpoint.
//
// Two layers, both pure:
//   - `EventStreamDecoder` takes raw body chunks, splits them into lines
//     (a line may span chunks) and decodes each as lossy UTF-8.
//   - `EventStreamParser` takes one line at a time and dispatches an event
//     when a blank line ends it.
// Field handling:
//   - `event:` sets the event name (default "message")
//   - `data:`  appends a data line; multiple lines are joined with '\n'
//   - `id:`, `retry:` and unknown fields are ignored; there is no resume
//     and no reconnection
//   - lines starting with ':' are comments (keep-alives)
// A single leading space after the colon is stripped. Events whose data would
// exceed the configured byte limit are discarded whole. A line longer than
// the limit is never buffered in full: its bytes are dropped as they arrive
// and the event it belongs to is discarded.

use crate::core::model::LogRecord;
use crate::util::constants::{DEFAULT_EVENT_NAME, LOG_UPDATE_EVENT, MAX_EVENT_BYTES};

/// One dispatched event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    pub event: String,
    pub data: String,
}

/// Incremental event-stream parser.
#[derive(Debug)]
pub struct EventStreamParser {
    event: Option<String>,
    data: String,
    has_data: bool,
    oversized: bool,
    max_event_bytes: usize,
}

impl EventStreamParser {
    pub fn new() -> Self {
        Self::with_max_event_bytes(MAX_EVENT_BYTES)
    }

    pub fn with_max_event_bytes(max_event_bytes: usize) -> Self {
        Self {
            event: None,
            data: String::new(),
            has_data: false,
            oversized: false,
            max_event_bytes,
        }
    }

    /// Feed one line. A trailing `\n` or `\r\n` is tolerated.
    ///
    /// Returns the completed event when `line` is the blank line ending it.
    pub fn push_line(&mut self, line: &str) -> Option<SseEvent> {
        let line = line.strip_suffix('\n').unwrap_or(line);
        let line = line.strip_suffix('\r').unwrap_or(line);

        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.append_data(value),
            _ => {}
        }
        None
    }

    /// Discard the event in progress once a blank line ends it.
    fn mark_oversized(&mut self) {
        self.oversized = true;
        self.data.clear();
    }

    fn append_data(&mut self, value: &str) {
        if self.oversized {
            return;
        }
        let separator = usize::from(self.has_data);
        if self.data.len() + separator + value.len() > self.max_event_bytes {
            self.mark_oversized();
            return;
        }
        if self.has_data {
            self.data.push('\n');
        }
        self.data.push_str(value);
        self.has_data = true;
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let event = self.event.take();
        let data = std::mem::take(&mut self.data);
        let has_data = std::mem::replace(&mut self.has_data, false);

        if std::mem::replace(&mut self.oversized, false) {
            tracing::warn!(
                event = event.as_deref().unwrap_or(DEFAULT_EVENT_NAME),
                max_bytes = self.max_event_bytes,
                "Event stream: oversized event discarded"
            );
            return None;
        }
        if !has_data {
            return None;
        }

        Some(SseEvent {
            event: event.unwrap_or_else(|| DEFAULT_EVENT_NAME.to_string()),
            data,
        })
    }
}

impl Default for EventStreamParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Bytes allowed on one line on top of the event limit, for the field name,
/// the separator and the line ending.
const LINE_OVERHEAD_BYTES: usize = 16;

/// Splits raw body chunks into lines and feeds them to the parser.
///
/// At most one line is buffered, and never more than the event limit plus a
/// small overhead. Invalid UTF-8 is replaced rather than rejected, so one bad
/// byte costs at most the event it sits in.
#[derive(Debug)]
pub struct EventStreamDecoder {
    parser: EventStreamParser,
    line: Vec<u8>,
    line_overflowed: bool,
    max_line_bytes: usize,
}

impl EventStreamDecoder {
    pub fn new() -> Self {
        Self::with_max_event_bytes(MAX_EVENT_BYTES)
    }

    pub fn with_max_event_bytes(max_event_bytes: usize) -> Self {
        Self {
            parser: EventStreamParser::with_max_event_bytes(max_event_bytes),
            line: Vec::new(),
            line_overflowed: false,
            max_line_bytes: max_event_bytes.saturating_add(LINE_OVERHEAD_BYTES),
        }
    }

    /// Feed one chunk; returns every event it completes, in order.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        let mut events = Vec::new();
        let mut rest = chunk;
        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            self.buffer(&rest[..=pos]);
            if let Some(event) = self.end_line() {
                events.push(event);
            }
            rest = &rest[pos + 1..];
        }
        self.buffer(rest);
        events
    }

    fn buffer(&mut self, bytes: &[u8]) {
        if self.line_overflowed || bytes.is_empty() {
            return;
        }
        if self.line.len() + bytes.len() > self.max_line_bytes {
            self.line_overflowed = true;
            self.line = Vec::new();
            return;
        }
        self.line.extend_from_slice(bytes);
    }

    fn end_line(&mut self) -> Option<SseEvent> {
        if std::mem::replace(&mut self.line_overflowed, false) {
            tracing::debug!(
                max_bytes = self.max_line_bytes,
                "Event stream: over-long line dropped"
            );
            self.parser.mark_oversized();
            return None;
        }
        let event = {
            let text = String::from_utf8_lossy(&self.line);
            self.parser.push_line(&text)
        };
        self.line.clear();
        event
    }
}

impl Default for EventStreamDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a `log_update` event into a record.
///
/// Returns `None` for any other event name so callers can skip it.
pub fn decode_log_update(event: &SseEvent) -> Option<Result<LogRecord, serde_json::Error>> {
    if event.event != LOG_UPDATE_EVENT {
        return None;
    }
    Some(serde_json::from_str(&event.data))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(parser: &mut EventStreamParser, text: &str) -> Vec<SseEvent> {
        text.split_inclusive('\n')
            .filter_map(|line| parser.push_line(line))
            .collect()
    }

    #[test]
    fn test_named_event_dispatched_on_blank_line() {
        let mut parser = EventStreamParser::new();
        let events = feed(
            &mut parser,
            "event: log_update\ndata: {\"file\":\"a.log\",\"lines\":[\"x\"]}\n\n",
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "log_update");
        assert_eq!(events[0].data, r#"{"file":"a.log","lines":["x"]}"#);
    }

    #[test]
    fn test_no_dispatch_without_blank_line() {
        let mut parser = EventStreamParser::new();
        let events = feed(&mut parser, "event: log_update\ndata: {}\n");
        assert!(events.is_empty());
    }

    #[test]
    fn test_comments_and_unknown_fields_ignored() {
        let mut parser = EventStreamParser::new();
        let events = feed(
            &mut parser,
            ": keep-alive\n\nretry: 3000\nfoo: bar\ndata: hello\n\n",
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "message");
        assert_eq!(events[0].data, "hello");
    }

    #[test]
    fn test_multi_line_data_joined_with_newline() {
        let mut parser = EventStreamParser::new();
        let events = feed(&mut parser, "data: first\ndata:second\ndata:  third\n\n");
        assert_eq!(events.len(), 1);
        // Only one leading space is stripped.
        assert_eq!(events[0].data, "first\nsecond\n third");
    }

    #[test]
    fn test_crlf_line_endings() {
        let mut parser = EventStreamParser::new();
        let events = feed(&mut parser, "event: log_update\r\ndata: {}\r\n\r\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "log_update");
        assert_eq!(events[0].data, "{}");
    }

    #[test]
    fn test_event_without_data_is_not_dispatched() {
        let mut parser = EventStreamParser::new();
        let events = feed(&mut parser, "event: log_update\n\ndata: next\n\n");
        assert_eq!(events.len(), 1);
        // The name from the empty event must not leak into the next one.
        assert_eq!(events[0].event, "message");
    }

    #[test]
    fn test_id_field_is_ignored() {
        let mut parser = EventStreamParser::new();
        let events = feed(&mut parser, "id: 7\ndata: a\n\n");
        assert_eq!(
            events,
            vec![SseEvent {
                event: "message".to_string(),
                data: "a".to_string(),
            }]
        );
    }

    #[test]
    fn test_oversized_event_discarded_and_parser_recovers() {
        let mut parser = EventStreamParser::with_max_event_bytes(8);
        let events = feed(
            &mut parser,
            "data: 0123456789abcdef\n\ndata: ok\n\n",
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "ok");
    }

    #[test]
    fn test_decoder_joins_lines_split_across_chunks() {
        let mut decoder = EventStreamDecoder::new();
        assert!(decoder.push_chunk(b"event: log_up").is_empty());
        assert!(decoder.push_chunk(b"date\r").is_empty());
        assert!(decoder.push_chunk(b"\ndata: {}\r\n").is_empty());
        let events = decoder.push_chunk(b"\r\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "log_update");
        assert_eq!(events[0].data, "{}");
    }

    #[test]
    fn test_decoder_replaces_invalid_utf8_and_keeps_going() {
        let mut decoder = EventStreamDecoder::new();
        let mut body = b"event: log_update\ndata: {\"file\":\"a".to_vec();
        body.push(0xFF);
        body.extend_from_slice(b".log\",\"lines\":[]}\n\n");
        body.extend_from_slice(b"event: log_update\ndata: {\"file\":\"b.log\",\"lines\":[]}\n\n");

        let events = decoder.push_chunk(&body);
        assert_eq!(events.len(), 2);
        let first = decode_log_update(&events[0]).unwrap().unwrap();
        assert_eq!(first.file, "a\u{FFFD}.log");
        let second = decode_log_update(&events[1]).unwrap().unwrap();
        assert_eq!(second.file, "b.log");
    }

    #[test]
    fn test_decoder_bounds_an_unterminated_line() {
        let mut decoder = EventStreamDecoder::with_max_event_bytes(64);
        assert!(decoder.push_chunk(b"event: log_update\ndata: ").is_empty());
        for _ in 0..1024 {
            assert!(decoder.push_chunk(&[b'a'; 1024]).is_empty());
            assert!(decoder.line.len() <= 64 + LINE_OVERHEAD_BYTES);
        }
        // The over-long event is dropped; the next one gets through.
        let events = decoder.push_chunk(b"\n\ndata: ok\n\n");
        assert_eq!(
            events,
            vec![SseEvent {
                event: "message".to_string(),
                data: "ok".to_string(),
            }]
        );
    }

    #[test]
    fn test_decode_log_update() {
        let event = SseEvent {
            event: "log_update".to_string(),
            data: r#"{"file":"app.log","lines":["a\n","b\n"]}"#.to_string(),
        };
        let record = decode_log_update(&event).unwrap().unwrap();
        assert_eq!(
            record,
            LogRecord::new("app.log", vec!["a\n".to_string(), "b\n".to_string()])
        );
    }

    #[test]
    fn test_decode_skips_other_events_and_rejects_bad_payload() {
        let other = SseEvent {
            event: "heartbeat".to_string(),
            data: "{}".to_string(),
        };
        assert!(decode_log_update(&other).is_none());

        let malformed = SseEvent {
            event: "log_update".to_string(),
            data: r#"{"file":"a.log"}"#.to_string(),
        };
        assert!(decode_log_update(&malformed).unwrap().is_err());
    }
}
