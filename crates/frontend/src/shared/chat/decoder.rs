//! Incremental decoder for `text/event-stream` style bodies
//!
//! Bytes arrive in arbitrary chunks: a chunk may end in the middle of a UTF-8
//! code point or in the middle of a frame. The decoder buffers both and only
//! emits complete frames (terminated by a blank line).

const FRAME_DELIMITER: &str = "\n\n";

/// One event frame: optional `event:` name and its `data:` lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SseFrame {
    pub event: Option<String>,
    pub data: Vec<String>,
}

impl SseFrame {
    pub fn parse(raw: &str) -> Self {
        let mut frame = SseFrame::default();
        for line in raw.lines() {
            let line = line.trim_end_matches('\r');
            if let Some(event) = line.strip_prefix("event:") {
                frame.event = Some(event.trim().to_string());
            } else if let Some(data) = line.strip_prefix("data:") {
                frame.data.push(data.strip_prefix(' ').unwrap_or(data).to_string());
            }
            // comments (":") and unknown fields are ignored
        }
        frame
    }

    pub fn is_error(&self) -> bool {
        self.event.as_deref() == Some("error")
    }

    pub fn is_empty(&self) -> bool {
        self.event.is_none() && self.data.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct SseDecoder {
    /// Trailing bytes of an incomplete code point
    pending_bytes: Vec<u8>,
    /// Decoded text not yet terminated by a blank line
    buffer: String,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and collect every frame it completes
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.pending_bytes.extend_from_slice(chunk);
        self.decode_pending();
        self.take_frames()
    }

    /// End of stream: flush a final frame that had no trailing blank line
    pub fn finish(&mut self) -> Vec<SseFrame> {
        if !self.pending_bytes.is_empty() {
            let rest = std::mem::take(&mut self.pending_bytes);
            self.buffer.push_str(&String::from_utf8_lossy(&rest));
        }
        let mut frames = self.take_frames();
        let rest = std::mem::take(&mut self.buffer);
        let last = SseFrame::parse(&rest);
        if !last.is_empty() {
            frames.push(last);
        }
        frames
    }

    fn decode_pending(&mut self) {
        loop {
            match std::str::from_utf8(&self.pending_bytes) {
                Ok(text) => {
                    self.buffer.push_str(text);
                    self.pending_bytes.clear();
                    return;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    self.buffer
                        .push_str(&String::from_utf8_lossy(&self.pending_bytes[..valid]));
                    match e.error_len() {
                        Some(invalid) => {
                            self.buffer.push(char::REPLACEMENT_CHARACTER);
                            self.pending_bytes.drain(..valid + invalid);
                        }
                        None => {
                            // incomplete code point, wait for the next chunk
                            self.pending_bytes.drain(..valid);
                            return;
                        }
                    }
                }
            }
        }
    }

    fn take_frames(&mut self) -> Vec<SseFrame> {
        let mut frames = Vec::new();
        while let Some(pos) = self.buffer.find(FRAME_DELIMITER) {
            let raw: String = self.buffer.drain(..pos + FRAME_DELIMITER.len()).collect();
            let frame = SseFrame::parse(&raw[..pos]);
            if !frame.is_empty() {
                frames.push(frame);
            }
        }
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STREAM: &str = "data: {\"text\":\"a\",\"is_done\":false}\n\ndata: {\"text\":\"b\",\"is_done\":true}\n\n";

    fn data_of(frames: &[SseFrame]) -> Vec<String> {
        frames.iter().flat_map(|f| f.data.clone()).collect()
    }

    #[test]
    fn test_two_frames_in_one_chunk() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(STREAM.as_bytes());
        assert_eq!(
            data_of(&frames),
            vec![
                r#"{"text":"a","is_done":false}"#,
                r#"{"text":"b","is_done":true}"#
            ]
        );
        assert!(decoder.finish().is_empty());
    }

    #[test]
    fn test_every_split_point_yields_same_frames() {
        let bytes = STREAM.as_bytes();
        for split in 0..=bytes.len() {
            let mut decoder = SseDecoder::new();
            let mut frames = decoder.feed(&bytes[..split]);
            frames.extend(decoder.feed(&bytes[split..]));
            frames.extend(decoder.finish());
            assert_eq!(frames.len(), 2, "split at {split}");
            assert_eq!(data_of(&frames)[1], r#"{"text":"b","is_done":true}"#);
        }
    }

    #[test]
    fn test_split_inside_code_point() {
        let text = "data: {\"text\":\"привет\"}\n\n";
        let bytes = text.as_bytes();
        // 'п' is two bytes; split between them
        let split = text.find('п').unwrap() + 1;

        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(&bytes[..split]).is_empty());
        let frames = decoder.feed(&bytes[split..]);

        assert_eq!(data_of(&frames), vec![r#"{"text":"привет"}"#]);
    }

    #[test]
    fn test_byte_by_byte() {
        let mut decoder = SseDecoder::new();
        let mut frames = Vec::new();
        for b in STREAM.as_bytes() {
            frames.extend(decoder.feed(std::slice::from_ref(b)));
        }
        assert_eq!(frames.len(), 2);
    }

    #[test]
    fn test_error_event_and_unterminated_tail() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(b"event: error\ndata: {\"error\":\"quota\"}\n\n: keep-alive\n\ndata: tail");
        assert_eq!(frames.len(), 1);
        assert!(frames[0].is_error());
        assert_eq!(frames[0].data, vec![r#"{"error":"quota"}"#]);

        let tail = decoder.finish();
        assert_eq!(tail, vec![SseFrame {
            event: None,
            data: vec!["tail".to_string()]
        }]);
    }

    #[test]
    fn test_invalid_utf8_replaced() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(b"data: a\xffb\n\n");
        assert_eq!(frames[0].data, vec!["a\u{FFFD}b"]);
    }
}
