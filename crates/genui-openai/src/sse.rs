//! Incremental decoder for the server-sent events framing OpenAI uses when
//! streaming.
//!
//! Frames are separated by a blank line. Only `data:` lines matter here;
//! comments, `event:` and `id:` lines are skipped. A `[DONE]` payload marks
//! the end of the stream.
use crate::error::OpenAiError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseFrame {
    Data(String),
    Done,
}

/// Buffers raw bytes until complete frames are available. Network chunks may
/// split frames (and UTF-8 sequences) anywhere.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buf: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed `chunk` and return every frame it completed, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<SseFrame>, OpenAiError> {
        self.buf.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some((end, separator_len)) = find_frame_end(&self.buf) {
            let frame: Vec<u8> = self.buf.drain(..end + separator_len).collect();
            let text = std::str::from_utf8(&frame[..end])?;

            if let Some(frame) = parse_frame(text) {
                frames.push(frame);
            }
        }

        Ok(frames)
    }

    /// `true` if bytes of an unfinished frame are pending.
    pub fn has_pending(&self) -> bool {
        self.buf.iter().any(|byte| !byte.is_ascii_whitespace())
    }
}

fn find_frame_end(buf: &[u8]) -> Option<(usize, usize)> {
    let lf = buf.windows(2).position(|w| w == b"\n\n").map(|pos| (pos, 2));
    let crlf = buf
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .map(|pos| (pos, 4));

    match (lf, crlf) {
        (Some(lf), Some(crlf)) => Some(if crlf.0 < lf.0 { crlf } else { lf }),
        (lf, crlf) => lf.or(crlf),
    }
}

fn parse_frame(text: &str) -> Option<SseFrame> {
    let mut data: Option<String> = None;

    for line in text.lines() {
        let Some(value) = line.strip_prefix("data:") else {
            continue;
        };
        let value = value.strip_prefix(' ').unwrap_or(value);

        match data.as_mut() {
            Some(data) => {
                data.push('\n');
                data.push_str(value);
            }
            None => data = Some(value.to_string()),
        }
    }

    let data = data?;
    if data.trim() == "[DONE]" {
        return Some(SseFrame::Done);
    }
    Some(SseFrame::Data(data))
}
