//! Output Sink buffer
//!
//! Append-only text with an optional scrollback limit. When the limit is
//! exceeded the oldest text is dropped, cutting on a char boundary.

#[derive(Clone, Debug, Default)]
pub struct OutputBuffer {
    text: String,
    limit: Option<usize>,
}

impl OutputBuffer {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            text: String::new(),
            limit,
        }
    }

    /// Append text. Returns true if older text was dropped to make room.
    pub fn append(&mut self, text: &str) -> bool {
        self.text.push_str(text);
        match self.limit {
            Some(limit) if self.text.len() > limit => {
                let mut cut = self.text.len() - limit;
                while !self.text.is_char_boundary(cut) {
                    cut += 1;
                }
                self.text.drain(..cut);
                true
            }
            _ => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_append_order() {
        let mut out = OutputBuffer::new(None);
        assert!(!out.append("a\n"));
        assert!(!out.append("b\n"));
        assert_eq!(out.as_str(), "a\nb\n");
    }

    #[test]
    fn test_scrollback_drops_oldest() {
        let mut out = OutputBuffer::new(Some(8));
        out.append("first\n");
        assert!(out.append("second\n"));
        assert_eq!(out.as_str(), "\nsecond\n");
        assert_eq!(out.len(), 8);
    }

    #[test]
    fn test_scrollback_respects_char_boundary() {
        let mut out = OutputBuffer::new(Some(3));
        out.append("éé");
        // 4 bytes; cutting 1 byte would split the first 'é'
        assert_eq!(out.as_str(), "é");
    }
}
