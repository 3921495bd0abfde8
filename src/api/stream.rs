//! Streaming chunk relay
//!
//! The proxy's streaming body is opaque text with no framing of its own, so
//! the client's only parsing concern is UTF-8. Multi-byte sequences may be
//! split across network chunks; decode state survives between reads so no
//! character is ever torn in half.

use futures_util::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::api::error::ChatError;

/// Incremental UTF-8 decoder tolerant of chunk boundaries inside multi-byte
/// sequences. Invalid bytes decode to U+FFFD instead of failing.
#[derive(Debug, Default)]
pub struct Utf8ChunkDecoder {
    pending: Vec<u8>,
}

impl Utf8ChunkDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next chunk, returning all complete text it finishes.
    ///
    /// Trailing bytes belonging to an incomplete sequence are carried over
    /// and prepended to the next call's input. UTF-8 sequences are at most
    /// four bytes, so the carry never exceeds three.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        let mut out = String::new();
        let mut offset = 0;
        while offset < bytes.len() {
            match std::str::from_utf8(&bytes[offset..]) {
                Ok(valid) => {
                    out.push_str(valid);
                    offset = bytes.len();
                }
                Err(err) => {
                    let valid_up_to = err.valid_up_to();
                    // Bytes below valid_up_to are known-good UTF-8.
                    out.push_str(
                        std::str::from_utf8(&bytes[offset..offset + valid_up_to])
                            .unwrap_or_default(),
                    );
                    offset += valid_up_to;
                    match err.error_len() {
                        Some(invalid_len) => {
                            out.push('\u{FFFD}');
                            offset += invalid_len;
                        }
                        None => {
                            // Incomplete trailing sequence; hold it for the
                            // next chunk.
                            self.pending.extend_from_slice(&bytes[offset..]);
                            offset = bytes.len();
                        }
                    }
                }
            }
        }
        out
    }

    /// Flush any carried bytes at end of stream. A dangling partial sequence
    /// becomes a single U+FFFD.
    pub fn finish(self) -> String {
        if self.pending.is_empty() {
            String::new()
        } else {
            "\u{FFFD}".to_string()
        }
    }
}

/// Relay decoded text chunks to `on_delta` in arrival order.
///
/// The cancellation token is checked before every read; a fired token
/// releases the stream, which aborts the underlying connection, and then
/// reports [`ChatError::Cancelled`]. Stream exhaustion is a normal return.
pub(crate) async fn relay_text_chunks<S, B, E>(
    mut stream: S,
    cancel: &CancellationToken,
    on_delta: &mut dyn FnMut(&str),
) -> Result<(), ChatError>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    ChatError: From<E>,
{
    let mut decoder = Utf8ChunkDecoder::new();

    loop {
        if cancel.is_cancelled() {
            drop(stream);
            return Err(ChatError::Cancelled);
        }

        match stream.next().await {
            Some(Ok(chunk)) => {
                let text = decoder.decode(chunk.as_ref());
                on_delta(&text);
            }
            Some(Err(err)) => return Err(ChatError::from(err)),
            None => return Ok(()),
        }
    }
}
