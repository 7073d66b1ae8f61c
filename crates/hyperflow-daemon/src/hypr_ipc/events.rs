//! Hyprland event stream and line parsing
//!
//! ## Protocol
//!
//! After connecting to `.socket2.sock` the compositor writes one event per
//! line, `TYPE>>DATA\n`, with no request needed. `DATA` is a comma
//! separated list with no escaping, so a window title containing a comma
//! spills into extra fields.

use std::path::{Path, PathBuf};
use std::time::Duration;

use hyperflow_config::field_index;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixStream;
use tokio::time::sleep;
use tracing::{info, warn};

use super::HyprError;

/// Separator between the event type and its data
pub const EVENT_DELIMITER: &str = ">>";

/// Initial delay between retry attempts (100ms)
const INITIAL_RETRY_DELAY_MS: u64 = 100;

/// Maximum delay between retry attempts (2 seconds)
const MAX_RETRY_DELAY_MS: u64 = 2_000;

/// One compositor event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Wire name of the event, e.g. `openwindow`
    pub event_type: String,
    /// Positional data; names come from the field table
    pub fields: Vec<String>,
}

impl Event {
    /// Value of a named property for this event's type
    ///
    /// Returns `None` if the event type or property is unknown, or if the
    /// line was too short to carry that field.
    pub fn field(&self, property: &str) -> Option<&str> {
        let index = field_index(&self.event_type, property)?;
        self.fields.get(index).map(String::as_str)
    }
}

/// Parse one stripped event line
///
/// Splits on the first `>>` into the type and the data, then splits the data
/// on `,`. Lines without the delimiter, or with an empty type, yield `None`.
pub fn parse_event(line: &str) -> Option<Event> {
    let (event_type, data) = line.split_once(EVENT_DELIMITER)?;
    if event_type.is_empty() {
        return None;
    }

    Some(Event {
        event_type: event_type.to_string(),
        fields: data.split(',').map(str::to_string).collect(),
    })
}

/// Line reader over the Hyprland event socket
///
/// The socket is closed when the stream is dropped.
#[derive(Debug)]
pub struct HyprEventStream {
    reader: BufReader<UnixStream>,
    /// Bytes of a line not yet terminated; kept across cancelled reads
    pending: Vec<u8>,
    socket_path: PathBuf,
}

impl HyprEventStream {
    /// Connect to the event socket at `socket_path`
    ///
    /// # Errors
    ///
    /// Returns `HyprError::ConnectionFailed` if the connection fails.
    pub async fn connect(socket_path: &Path) -> Result<Self, HyprError> {
        let socket =
            UnixStream::connect(socket_path)
                .await
                .map_err(|e| HyprError::ConnectionFailed {
                    path: socket_path.to_path_buf(),
                    source: e,
                })?;

        Ok(Self {
            reader: BufReader::new(socket),
            pending: Vec::new(),
            socket_path: socket_path.to_path_buf(),
        })
    }

    /// Connect with retry logic and exponential backoff
    ///
    /// # Backoff Strategy
    ///
    /// - Initial delay: 100ms
    /// - Each retry: delay *= 2
    /// - Maximum delay: 2 seconds (capped)
    ///
    /// # Arguments
    ///
    /// * `max_retries` - Additional attempts after the first (0 means try once)
    ///
    /// # Errors
    ///
    /// With `max_retries == 0` the connection error is returned as is.
    /// Otherwise returns `HyprError::MaxRetriesExceeded` once all attempts fail.
    pub async fn connect_with_retry(
        socket_path: &Path,
        max_retries: u32,
    ) -> Result<Self, HyprError> {
        if max_retries == 0 {
            return Self::connect(socket_path).await;
        }

        let mut attempt = 0;
        let mut delay_ms = INITIAL_RETRY_DELAY_MS;

        loop {
            attempt += 1;

            match Self::connect(socket_path).await {
                Ok(stream) => {
                    if attempt > 1 {
                        info!("Hyprland event socket connected after {} attempt(s)", attempt);
                    }
                    return Ok(stream);
                }
                Err(e) if attempt > max_retries => {
                    warn!(
                        attempts = attempt,
                        last_error = %e,
                        "Failed to connect to Hyprland event socket after all retry attempts"
                    );
                    return Err(HyprError::MaxRetriesExceeded { attempts: attempt });
                }
                Err(e) => {
                    warn!(
                        attempt = attempt,
                        max_retries = max_retries,
                        delay_ms = delay_ms,
                        error = %e,
                        "Hyprland event socket connection failed, retrying..."
                    );

                    sleep(Duration::from_millis(delay_ms)).await;

                    delay_ms = (delay_ms * 2).min(MAX_RETRY_DELAY_MS);
                }
            }
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Read the next line, stripped of surrounding whitespace
    ///
    /// Returns `Ok(None)` once the compositor closes the socket. A final line
    /// without a trailing newline is still returned before that. Invalid
    /// UTF-8 is replaced rather than treated as an error.
    ///
    /// Cancel safe: a partially received line is kept and completed by the
    /// next call.
    pub async fn next_line(&mut self) -> Result<Option<String>, HyprError> {
        let bytes_read = self
            .reader
            .read_until(b'\n', &mut self.pending)
            .await
            .map_err(HyprError::ReceiveFailed)?;

        if bytes_read == 0 && self.pending.is_empty() {
            return Ok(None);
        }

        let line = String::from_utf8_lossy(&self.pending).trim().to_string();
        self.pending.clear();
        Ok(Some(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;
    use tokio::net::UnixListener;

    #[test]
    fn test_parse_open_window() {
        let event = parse_event("openwindow>>0xdead,1,spotify,Spotify - Song").unwrap();

        assert_eq!(event.event_type, "openwindow");
        assert_eq!(event.fields, vec!["0xdead", "1", "spotify", "Spotify - Song"]);
    }

    #[test]
    fn test_lines_without_delimiter_are_dropped() {
        for line in ["", "openwindow", "openwindow>0xdead", "openwindow 0xdead,1", ">"] {
            assert_eq!(parse_event(line), None, "line {:?} should be dropped", line);
        }
    }

    #[test]
    fn test_empty_type_is_dropped() {
        assert_eq!(parse_event(">>0xdead,1"), None);
    }

    #[test]
    fn test_splits_on_first_delimiter_only() {
        let event = parse_event("windowtitlev2>>0xabc,a >> b").unwrap();
        assert_eq!(event.event_type, "windowtitlev2");
        assert_eq!(event.fields, vec!["0xabc", "a >> b"]);
    }

    #[test]
    fn test_empty_data_yields_single_empty_field() {
        let event = parse_event("configreloaded>>").unwrap();
        assert_eq!(event.fields, vec![""]);
    }

    #[test]
    fn test_commas_are_not_escaped() {
        let event = parse_event("activewindow>>kitty,vim a,b").unwrap();
        assert_eq!(event.fields, vec!["kitty", "vim a", "b"]);
        assert_eq!(event.field("title"), Some("vim a"));
    }

    #[test]
    fn test_unknown_types_still_parse() {
        let event = parse_event("fullscreen>>1").unwrap();
        assert_eq!(event.event_type, "fullscreen");
        assert_eq!(event.field("state"), None);
    }

    #[test]
    fn test_field_out_of_range() {
        let event = parse_event("openwindow>>0xdead,1").unwrap();
        assert_eq!(event.field("workspace"), Some("1"));
        assert_eq!(event.field("class"), None);
    }

    #[tokio::test]
    async fn test_stream_reads_lines_until_eof() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".socket2.sock");
        let listener = UnixListener::bind(&path).unwrap();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket
                .write_all(b"workspace>>3\r\n  activewindow>>kitty,~ \nbad\xffline\nlast>>x")
                .await
                .unwrap();
        });

        let mut stream = HyprEventStream::connect(&path).await.unwrap();
        assert_eq!(stream.socket_path(), path.as_path());

        assert_eq!(stream.next_line().await.unwrap().as_deref(), Some("workspace>>3"));
        assert_eq!(
            stream.next_line().await.unwrap().as_deref(),
            Some("activewindow>>kitty,~")
        );
        assert_eq!(
            stream.next_line().await.unwrap().as_deref(),
            Some("bad\u{fffd}line")
        );
        assert_eq!(stream.next_line().await.unwrap().as_deref(), Some("last>>x"));
        assert_eq!(stream.next_line().await.unwrap(), None);

        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_connect_to_missing_socket_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.sock");

        match HyprEventStream::connect(&path).await.unwrap_err() {
            HyprError::ConnectionFailed { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("Expected ConnectionFailed, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_retry_gives_up_with_attempt_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.sock");

        match HyprEventStream::connect_with_retry(&path, 1).await.unwrap_err() {
            HyprError::MaxRetriesExceeded { attempts } => assert_eq!(attempts, 2),
            other => panic!("Expected MaxRetriesExceeded, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_zero_retries_returns_connection_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.sock");

        let err = HyprEventStream::connect_with_retry(&path, 0).await.unwrap_err();
        assert!(matches!(err, HyprError::ConnectionFailed { .. }));
    }
}
