//! Skip strategies applied before every token.

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Skipper {
    /// Skip nothing.
    None,
    /// Skip Unicode whitespace.
    #[default]
    Whitespace,
    /// Skip whitespace, `// line` and `/* block */` comments.
    WhitespaceAndComments,
}

impl Skipper {
    /// Position of the first significant byte at or after `pos`.
    pub fn skip(self, text: &str, pos: u32) -> u32 {
        let mut pos = pos as usize;
        loop {
            let rest = text.get(pos..).unwrap_or("");
            let trimmed = match self {
                Skipper::None => return pos as u32,
                Skipper::Whitespace => return (pos + ws_len(rest)) as u32,
                Skipper::WhitespaceAndComments => ws_len(rest),
            };
            pos += trimmed;
            let rest = &rest[trimmed..];
            let comment = if let Some(line) = rest.strip_prefix("//") {
                2 + line.find('\n').map_or(line.len(), |idx| idx + 1)
            } else if let Some(block) = rest.strip_prefix("/*") {
                2 + block.find("*/").map_or(block.len(), |idx| idx + 2)
            } else {
                return pos as u32;
            };
            pos += comment;
        }
    }
}

fn ws_len(text: &str) -> usize {
    text.len() - text.trim_start().len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace() {
        assert_eq!(Skipper::Whitespace.skip("  \n\tx", 0), 4);
        assert_eq!(Skipper::Whitespace.skip("x", 0), 0);
        assert_eq!(Skipper::None.skip("  x", 0), 0);
    }

    #[test]
    fn test_comments() {
        let text = "  // one\n /* two */ x";
        assert_eq!(Skipper::WhitespaceAndComments.skip(text, 0), 20);
        assert_eq!(Skipper::Whitespace.skip(text, 0), 2);
    }

    #[test]
    fn test_unterminated_comment_runs_to_end() {
        let text = "/* open";
        assert_eq!(Skipper::WhitespaceAndComments.skip(text, 0), 7);
    }
}
