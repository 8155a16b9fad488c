//! Tolerant HTML scanner.
//!
//! Produces a flat token stream rather than a tree. Every byte of the input
//! is covered by exactly one token, in order, so concatenating token spans
//! reproduces the source. Malformed markup never fails: an unterminated tag
//! or comment runs to the end of input, and a `<` that does not start markup
//! is plain text.

use super::token::*;

/// Elements whose content is raw text up to the matching end tag.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Scanner over one HTML document or fragment.
pub struct Scanner<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
        }
    }

    /// Scan the whole input.
    pub fn tokenize(mut self) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        tokens
    }

    fn next_token(&mut self) -> Option<Token<'a>> {
        if self.pos >= self.bytes.len() {
            return None;
        }

        let start = self.pos;
        if self.bytes[start] == b'<' {
            if let Some(kind) = self.scan_markup(start) {
                return Some(Token {
                    kind,
                    span: start..self.pos,
                });
            }
            // A stray '<' is text.
            self.pos += 1;
        }

        while self.pos < self.bytes.len() && self.bytes[self.pos] != b'<' {
            self.pos += 1;
        }
        Some(Token {
            kind: TokenKind::Text,
            span: start..self.pos,
        })
    }

    /// Scan markup starting at a `<`. Leaves `pos` after the construct, or
    /// untouched and returns `None` when the `<` is not markup.
    fn scan_markup(&mut self, start: usize) -> Option<TokenKind<'a>> {
        let source: &'a str = self.source;
        let rest = &source[start..];

        if rest.starts_with("<!--") {
            self.pos = match self.source[start + 4..].find("-->") {
                Some(offset) => start + 4 + offset + 3,
                None => self.bytes.len(),
            };
            return Some(TokenKind::Comment);
        }

        if rest.starts_with("<!") || rest.starts_with("<?") {
            self.pos = self.find_byte(start + 2, b'>').map_or(self.bytes.len(), |i| i + 1);
            return Some(TokenKind::Declaration);
        }

        if rest.starts_with("</") {
            if !self.is_alpha_at(start + 2) {
                return None;
            }
            let name_end = self.scan_name(start + 2);
            let name = self.source[start + 2..name_end].to_ascii_lowercase();
            self.pos = self.find_byte(name_end, b'>').map_or(self.bytes.len(), |i| i + 1);
            return Some(TokenKind::EndTag { name });
        }

        if !self.is_alpha_at(start + 1) {
            return None;
        }

        let name_end = self.scan_name(start + 1);
        let name = self.source[start + 1..name_end].to_ascii_lowercase();
        let (attributes, attrs_end, tag_end, self_closing) = self.scan_attributes(name_end);
        let attributes_raw = source[name_end..attrs_end]
            .trim()
            .trim_end_matches('/')
            .trim_end();

        let tag = Tag {
            name,
            attributes,
            attributes_raw,
            self_closing,
        };

        // `<script/>` still opens a raw-text element; the slash is ignored.
        if RAW_TEXT_ELEMENTS.contains(&tag.name.as_str()) {
            let (content_end, element_end) = match self.find_raw_text_end(tag_end, &tag.name) {
                Some(close) => (
                    close,
                    self.find_byte(close + 2, b'>').map_or(self.bytes.len(), |i| i + 1),
                ),
                None => (self.bytes.len(), self.bytes.len()),
            };
            self.pos = element_end;
            return Some(TokenKind::RawText {
                tag,
                content: tag_end..content_end,
            });
        }

        self.pos = tag_end;
        Some(TokenKind::StartTag(tag))
    }

    /// Parse attributes from `i` up to the closing `>`.
    ///
    /// Returns the attributes, the index where attribute text ends, the index
    /// just past the tag, and whether the tag was self-closing.
    fn scan_attributes(&self, mut i: usize) -> (Attributes, usize, usize, bool) {
        let len = self.bytes.len();
        let mut attributes = Attributes::new();
        let mut self_closing = false;

        loop {
            i = self.skip_whitespace(i);
            if i >= len {
                return (attributes, len, len, false);
            }

            match self.bytes[i] {
                b'>' => return (attributes, i, i + 1, self_closing),
                b'/' => {
                    self_closing = true;
                    i += 1;
                }
                _ => {
                    self_closing = false;
                    let name_start = i;
                    while i < len
                        && !self.bytes[i].is_ascii_whitespace()
                        && !matches!(self.bytes[i], b'=' | b'>' | b'/')
                    {
                        i += 1;
                    }
                    if i == name_start {
                        // Stray '=' with no name.
                        i += 1;
                        continue;
                    }
                    let name = self.source[name_start..i].to_ascii_lowercase();

                    let after_name = self.skip_whitespace(i);
                    if after_name < len && self.bytes[after_name] == b'=' {
                        let (value, next) = self.scan_value(self.skip_whitespace(after_name + 1));
                        attributes.push(name, Some(value));
                        i = next;
                    } else {
                        attributes.push(name, None);
                    }
                }
            }
        }
    }

    /// Parse one attribute value at `i`, quoted or bare.
    fn scan_value(&self, i: usize) -> (String, usize) {
        let len = self.bytes.len();
        if i >= len {
            return (String::new(), len);
        }

        let quote = self.bytes[i];
        if quote == b'"' || quote == b'\'' {
            return match self.find_byte(i + 1, quote) {
                Some(close) => (self.source[i + 1..close].to_string(), close + 1),
                None => (self.source[i + 1..].to_string(), len),
            };
        }

        let mut end = i;
        while end < len && !self.bytes[end].is_ascii_whitespace() && self.bytes[end] != b'>' {
            end += 1;
        }
        (self.source[i..end].to_string(), end)
    }

    /// Index of the `</name` that closes a raw-text element, if any.
    fn find_raw_text_end(&self, from: usize, name: &str) -> Option<usize> {
        let len = self.bytes.len();
        let mut i = from;
        while let Some(offset) = self.source[i..].find("</") {
            let at = i + offset;
            let name_start = at + 2;
            let name_end = name_start + name.len();
            if name_end <= len
                && self.bytes[name_start..name_end].eq_ignore_ascii_case(name.as_bytes())
                && (name_end == len
                    || self.bytes[name_end].is_ascii_whitespace()
                    || matches!(self.bytes[name_end], b'>' | b'/'))
            {
                return Some(at);
            }
            i = name_start;
        }
        None
    }

    fn scan_name(&self, mut i: usize) -> usize {
        while i < self.bytes.len()
            && (self.bytes[i].is_ascii_alphanumeric() || matches!(self.bytes[i], b'-' | b':' | b'_'))
        {
            i += 1;
        }
        i
    }

    fn skip_whitespace(&self, mut i: usize) -> usize {
        while i < self.bytes.len() && self.bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        i
    }

    fn is_alpha_at(&self, i: usize) -> bool {
        self.bytes.get(i).is_some_and(|b| b.is_ascii_alphabetic())
    }

    fn find_byte(&self, from: usize, needle: u8) -> Option<usize> {
        self.bytes
            .get(from..)?
            .iter()
            .position(|&b| b == needle)
            .map(|offset| from + offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind<'_>> {
        Scanner::new(source).tokenize().into_iter().map(|t| t.kind).collect()
    }

    fn reassemble(source: &str) -> String {
        Scanner::new(source)
            .tokenize()
            .iter()
            .map(|t| &source[t.span.clone()])
            .collect()
    }

    #[test]
    fn test_spans_cover_source() {
        for source in [
            "<!DOCTYPE html><html><head><title>x</title></head><body>hi</body></html>",
            "a < b && c > d",
            "<div class=\"unterminated",
            "<script>if (a < b) { x = '</div>'; }</script><p>after</p>",
            "<!-- <script>nope</script> -->",
            "<style>p{}",
            "<",
            "",
        ] {
            assert_eq!(reassemble(source), source);
        }
    }

    #[test]
    fn test_start_tag_attributes() {
        let tokens = Scanner::new(r#"<script type="module" src='app.js' defer data-x=1>"#).tokenize();
        let tag = tokens[0].tag().expect("tag");
        assert_eq!(tag.name, "script");
        assert_eq!(tag.attributes.get("type"), Some("module"));
        assert_eq!(tag.attributes.get("src"), Some("app.js"));
        assert_eq!(tag.attributes.get("defer"), Some(""));
        assert_eq!(tag.attributes.get("data-x"), Some("1"));
    }

    #[test]
    fn test_raw_text_content() {
        let source = "<SCRIPT>let s = '<b>';</script >tail";
        let tokens = Scanner::new(source).tokenize();
        match &tokens[0].kind {
            TokenKind::RawText { tag, content } => {
                assert_eq!(tag.name, "script");
                assert_eq!(&source[content.clone()], "let s = '<b>';");
            }
            other => panic!("expected raw text, got {other:?}"),
        }
        assert_eq!(&source[tokens[0].span.clone()], "<SCRIPT>let s = '<b>';</script >");
        assert_eq!(tokens[1].kind, TokenKind::Text);
    }

    #[test]
    fn test_raw_text_needs_name_boundary() {
        let source = "<script>a = '</scripts>';</script>";
        let tokens = Scanner::new(source).tokenize();
        assert_eq!(tokens.len(), 1);
    }

    #[test]
    fn test_unclosed_script_runs_to_end() {
        let source = "<script>console.log(1)";
        let tokens = Scanner::new(source).tokenize();
        match &tokens[0].kind {
            TokenKind::RawText { content, .. } => {
                assert_eq!(&source[content.clone()], "console.log(1)");
            }
            other => panic!("expected raw text, got {other:?}"),
        }
    }

    #[test]
    fn test_comment_is_opaque() {
        let tokens = kinds("<!-- <script>x</script> --><p>");
        assert_eq!(tokens[0], TokenKind::Comment);
        assert!(matches!(&tokens[1], TokenKind::StartTag(tag) if tag.name == "p"));
    }

    #[test]
    fn test_self_closing_and_end_tags() {
        let tokens = kinds(r#"<link rel="stylesheet" href="a.css"/></HEAD>"#);
        match &tokens[0] {
            TokenKind::StartTag(tag) => {
                assert!(tag.self_closing);
                assert_eq!(tag.attributes_raw, r#"rel="stylesheet" href="a.css""#);
            }
            other => panic!("expected start tag, got {other:?}"),
        }
        assert_eq!(tokens[1], TokenKind::EndTag { name: "head".to_string() });
    }

    #[test]
    fn test_self_closing_script_is_raw_text() {
        let source = r#"<script src="app.js"/></script><p>after</p>"#;
        let tokens = Scanner::new(source).tokenize();
        match &tokens[0].kind {
            TokenKind::RawText { tag, content } => {
                assert_eq!(tag.attributes.get("src"), Some("app.js"));
                assert!(content.is_empty());
            }
            other => panic!("expected raw text, got {other:?}"),
        }
        assert_eq!(&source[tokens[0].span.clone()], r#"<script src="app.js"/></script>"#);
    }

    #[test]
    fn test_stray_less_than_is_text() {
        let tokens = kinds("1 < 2");
        assert!(tokens.iter().all(|k| *k == TokenKind::Text));
    }

    #[test]
    fn test_multibyte_text() {
        let source = "<p>héllo — wörld</p><script>const s = \"ü\";</script>";
        assert_eq!(reassemble(source), source);
    }
}
