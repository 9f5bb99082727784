//! Line-preserving front-matter header
//!
//! Unlike [`super::FrontMatter`], which deserializes YAML for rendering, a
//! [`Header`] keeps the raw lines of the block so it can be rewritten with
//! only the `slug:` line touched and everything else byte-for-byte intact.

use indexmap::IndexMap;

const DELIMITER: &str = "---";

/// Raw front-matter block at the top of a content file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    lines: Vec<String>,
}

impl Header {
    /// Split `content` into its header and the remaining body
    ///
    /// The header must open on the very first line (`---\n`) and is closed by
    /// the next line starting with `---`. The body is everything after the
    /// closing delimiter, leading newline included, so reassembly with
    /// [`Header::render`] is lossless.
    pub fn extract(content: &str) -> Option<(Self, &str)> {
        let rest = content.strip_prefix("---\n")?;
        let end = rest.find("\n---")?;

        let lines = rest[..end].split('\n').map(str::to_string).collect();
        let body = &rest[end + 1 + DELIMITER.len()..];

        Some((Self { lines }, body))
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Parse `key: value` lines, stripping one pair of matching quotes
    ///
    /// Lines without a colon, or with nothing before it, are ignored. A key
    /// repeated later in the block overrides the earlier value.
    pub fn fields(&self) -> IndexMap<String, String> {
        let mut fields = IndexMap::new();

        for line in &self.lines {
            let Some(colon) = line.find(':').filter(|&i| i > 0) else {
                continue;
            };
            let key = line[..colon].trim();
            let value = strip_quotes(line[colon + 1..].trim());
            fields.insert(key.to_string(), value.to_string());
        }

        fields
    }

    /// Get a field, treating empty values as absent
    pub fn get(&self, key: &str) -> Option<String> {
        self.fields().swap_remove(key).filter(|v| !v.is_empty())
    }

    /// Set the slug line
    ///
    /// Existing `slug:` lines are replaced in place. Otherwise the slug goes
    /// right after the first `title:` line, or at the top when there is none.
    pub fn set_slug(&mut self, slug: &str) {
        let slug_line = format!("slug: \"{}\"", slug);

        let mut replaced = false;
        for line in self.lines.iter_mut() {
            if is_key_line(line, "slug") {
                *line = slug_line.clone();
                replaced = true;
            }
        }
        if replaced {
            return;
        }

        match self.lines.iter().position(|line| is_key_line(line, "title")) {
            Some(pos) => self.lines.insert(pos + 1, slug_line),
            None => self.lines.insert(0, slug_line),
        }
    }

    /// Reassemble the file from this header and the original body
    pub fn render(&self, body: &str) -> String {
        format!(
            "{delim}\n{}\n{delim}{}",
            self.lines.join("\n"),
            body,
            delim = DELIMITER
        )
    }
}

fn is_key_line(line: &str, key: &str) -> bool {
    line.trim_start()
        .strip_prefix(key)
        .is_some_and(|rest| rest.starts_with(':'))
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.starts_with(quote) && value.ends_with(quote) {
            // A lone quote character strips to nothing
            return value.get(1..value.len() - 1).unwrap_or("");
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract() {
        let content = "---\ntitle: Hello\ndate: 2024-01-15\n---\n\nBody text.\n";
        let (header, body) = Header::extract(content).unwrap();
        assert_eq!(header.lines(), ["title: Hello", "date: 2024-01-15"]);
        assert_eq!(body, "\n\nBody text.\n");
        assert_eq!(header.render(body), content);
    }

    #[test]
    fn test_extract_missing_header() {
        assert!(Header::extract("# Just markdown\n").is_none());
        assert!(Header::extract("\n---\ntitle: late\n---\n").is_none());
        assert!(Header::extract("---\ntitle: unterminated\n").is_none());
    }

    #[test]
    fn test_extract_empty_header() {
        let (header, body) = Header::extract("---\n\n---\nBody").unwrap();
        assert_eq!(header.lines(), [""]);
        assert_eq!(body, "\nBody");
        assert!(header.fields().is_empty());
    }

    #[test]
    fn test_fields() {
        let content = "---\ntitle: \"My Post\"\nauthor: 'Ada'\nurl: https://example.com\n: orphan\nno colon here\n---\n";
        let (header, _) = Header::extract(content).unwrap();
        let fields = header.fields();

        assert_eq!(fields.get("title").map(String::as_str), Some("My Post"));
        assert_eq!(fields.get("author").map(String::as_str), Some("Ada"));
        assert_eq!(
            fields.get("url").map(String::as_str),
            Some("https://example.com")
        );
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("\"quoted\""), "quoted");
        assert_eq!(strip_quotes("'single'"), "single");
        assert_eq!(strip_quotes("\"mismatched'"), "\"mismatched'");
        assert_eq!(strip_quotes("\""), "");
        assert_eq!(strip_quotes("plain"), "plain");
    }

    #[test]
    fn test_get_empty_is_absent() {
        let (header, _) = Header::extract("---\nslug: \"\"\ntitle: T\n---\n").unwrap();
        assert_eq!(header.get("slug"), None);
        assert_eq!(header.get("title").as_deref(), Some("T"));
    }

    #[test]
    fn test_set_slug_after_title() {
        let (mut header, _) =
            Header::extract("---\ntitle: \"My Post\"\ndate: 2024-01-15\n---\n").unwrap();
        header.set_slug("my-post");
        assert_eq!(
            header.lines(),
            ["title: \"My Post\"", "slug: \"my-post\"", "date: 2024-01-15"]
        );
    }

    #[test]
    fn test_set_slug_replaces_in_place() {
        let (mut header, _) = Header::extract("---\nslug: \"\"\ntitle: T\n---\n").unwrap();
        header.set_slug("t");
        assert_eq!(header.lines(), ["slug: \"t\"", "title: T"]);
    }

    #[test]
    fn test_set_slug_without_title() {
        let (mut header, _) = Header::extract("---\ndate: 2024-01-15\n---\n").unwrap();
        header.set_slug("fallback");
        assert_eq!(header.lines(), ["slug: \"fallback\"", "date: 2024-01-15"]);
    }

    #[test]
    fn test_key_line_needs_colon() {
        assert!(is_key_line("  slug: x", "slug"));
        assert!(!is_key_line("slugline: x", "slug"));
        assert!(!is_key_line("subtitle: x", "title"));
    }
}
