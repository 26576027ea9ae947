//! Incremental decoding of object-shaped listing responses.
//!
//! The registry answers listing queries with one flat JSON object. To avoid
//! buffering whole result sets, the scanner below splits the raw byte stream
//! into complete `"key": value` entries as chunks arrive, decoding each one
//! on its own. Chunk boundaries may fall anywhere, including inside tokens.

use std::collections::VecDeque;

use bytes::Bytes;
use futures::{stream::BoxStream, StreamExt};
use serde_json::Value;

use crate::error::OroNpmAccessError;

/// Turns a response body stream into a single-pass stream of `(key, value)`
/// entries, yielded in wire order. Transport errors on the body and
/// malformed bodies surface as `Err` items and end the stream; entries
/// already decoded before the failure are still yielded first.
pub(crate) fn object_entries(
    body: BoxStream<'static, Result<Bytes, OroNpmAccessError>>,
) -> impl futures::Stream<Item = Result<(String, Value), OroNpmAccessError>> {
    let state = State {
        body,
        scanner: ObjectScanner::default(),
        pending: VecDeque::new(),
        done: false,
    };
    futures::stream::try_unfold(state, |mut state| async move {
        loop {
            if let Some(entry) = state.pending.pop_front() {
                return Ok(Some((entry, state)));
            }
            if state.done {
                return Ok(None);
            }
            match state.body.next().await {
                Some(Ok(chunk)) => state.scanner.push(&chunk, &mut state.pending)?,
                Some(Err(err)) => return Err(err),
                None => {
                    state.scanner.finish()?;
                    state.done = true;
                }
            }
        }
    })
}

struct State {
    body: BoxStream<'static, Result<Bytes, OroNpmAccessError>>,
    scanner: ObjectScanner,
    pending: VecDeque<(String, Value)>,
    done: bool,
}

/// Byte-level scanner for one top-level JSON object. Tracks string/escape
/// state and brace depth so that commas inside nested values or string
/// literals never split an entry.
#[derive(Default)]
struct ObjectScanner {
    entry: Vec<u8>,
    started: bool,
    closed: bool,
    in_string: bool,
    escaped: bool,
    depth: usize,
}

impl ObjectScanner {
    fn push(
        &mut self,
        chunk: &[u8],
        out: &mut VecDeque<(String, Value)>,
    ) -> Result<(), OroNpmAccessError> {
        for &byte in chunk {
            if self.closed {
                if !byte.is_ascii_whitespace() {
                    return Err(malformed("unexpected data after the end of the object"));
                }
                continue;
            }
            if !self.started {
                if byte.is_ascii_whitespace() {
                    continue;
                }
                if byte == b'{' {
                    self.started = true;
                    continue;
                }
                return Err(malformed("response is not a JSON object"));
            }
            if self.in_string {
                self.entry.push(byte);
                if self.escaped {
                    self.escaped = false;
                } else if byte == b'\\' {
                    self.escaped = true;
                } else if byte == b'"' {
                    self.in_string = false;
                }
                continue;
            }
            match byte {
                b'"' => {
                    self.in_string = true;
                    self.entry.push(byte);
                }
                b'{' | b'[' => {
                    self.depth += 1;
                    self.entry.push(byte);
                }
                b'}' | b']' if self.depth > 0 => {
                    self.depth -= 1;
                    self.entry.push(byte);
                }
                b'}' => {
                    self.flush(out)?;
                    self.closed = true;
                }
                b']' => return Err(malformed("unbalanced `]`")),
                b',' if self.depth == 0 => {
                    if self.entry.is_empty() {
                        return Err(malformed("unexpected `,`"));
                    }
                    self.flush(out)?;
                }
                _ => {
                    if byte.is_ascii_whitespace() && self.entry.is_empty() {
                        continue;
                    }
                    self.entry.push(byte);
                }
            }
        }
        Ok(())
    }

    fn flush(&mut self, out: &mut VecDeque<(String, Value)>) -> Result<(), OroNpmAccessError> {
        while matches!(self.entry.last(), Some(b) if b.is_ascii_whitespace()) {
            self.entry.pop();
        }
        if self.entry.is_empty() {
            // `{}`
            return Ok(());
        }
        let mut json = Vec::with_capacity(self.entry.len() + 2);
        json.push(b'{');
        json.extend_from_slice(&self.entry);
        json.push(b'}');
        let map: serde_json::Map<String, Value> =
            serde_json::from_slice(&json).map_err(|err| malformed(&err.to_string()))?;
        let mut pairs = map.into_iter();
        match (pairs.next(), pairs.next()) {
            (Some(pair), None) => {
                out.push_back(pair);
                self.entry.clear();
                Ok(())
            }
            _ => Err(malformed("expected a single key/value entry")),
        }
    }

    fn finish(&self) -> Result<(), OroNpmAccessError> {
        if self.closed {
            Ok(())
        } else {
            Err(malformed("body ended before the object was closed"))
        }
    }
}

fn malformed(message: &str) -> OroNpmAccessError {
    OroNpmAccessError::MalformedResponse(message.to_owned())
}
