//! Server-Sent Events line framing

/// Accumulates raw byte chunks and yields complete lines.
///
/// Bytes are kept until a newline arrives, so multi-byte characters and
/// events split across network chunks decode correctly.
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    pending: Vec<u8>,
}

impl SseLineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and drain every complete line (without the line ending)
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.pending.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }

    /// Whatever is left once the stream ends
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.pending);
        let line = String::from_utf8_lossy(&rest).trim_end_matches('\r').to_string();
        (!line.is_empty()).then_some(line)
    }
}

/// Payload of one `data:` line
#[derive(Debug, PartialEq, Eq)]
pub enum SseData<'a> {
    Json(&'a str),
    Done,
}

/// Extract the `data:` payload of a line; comments, other fields and blank lines yield `None`
pub fn data_payload(line: &str) -> Option<SseData<'_>> {
    let payload = line.strip_prefix("data:")?.trim_start();
    match payload {
        "" => None,
        "[DONE]" => Some(SseData::Done),
        json => Some(SseData::Json(json)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_split_across_chunks() {
        let mut buffer = SseLineBuffer::new();
        assert!(buffer.push(b"data: {\"a\"").is_empty());
        assert_eq!(buffer.push(b":1}\r\n\r\ndata: [DO"), vec!["data: {\"a\":1}", ""]);
        assert_eq!(buffer.push(b"NE]\n"), vec!["data: [DONE]"]);
        assert!(buffer.finish().is_none());
    }

    #[test]
    fn test_multibyte_character_split() {
        let text = "data: olá\n".as_bytes();
        let split = text.iter().position(|&b| b == 0xc3).unwrap() + 1;
        let mut buffer = SseLineBuffer::new();
        assert!(buffer.push(&text[..split]).is_empty());
        assert_eq!(buffer.push(&text[split..]), vec!["data: olá"]);
    }

    #[test]
    fn test_finish_returns_trailing_line() {
        let mut buffer = SseLineBuffer::new();
        buffer.push(b"data: [DONE]");
        assert_eq!(buffer.finish().as_deref(), Some("data: [DONE]"));
        assert!(buffer.finish().is_none());
    }

    #[test]
    fn test_data_payload() {
        assert_eq!(data_payload("data: {\"x\":1}"), Some(SseData::Json("{\"x\":1}")));
        assert_eq!(data_payload("data:[DONE]"), Some(SseData::Done));
        assert_eq!(data_payload(": keep-alive"), None);
        assert_eq!(data_payload("event: message"), None);
        assert_eq!(data_payload(""), None);
    }
}
