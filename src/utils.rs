// src/utils.rs
use std::fmt::Display;

/// Query string builder; values are percent-encoded, empty values dropped.
#[derive(Debug, Default, Clone)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, key: &str, value: impl Display) -> Self {
        let value = value.to_string();
        if !value.is_empty() {
            self.pairs.push((key.to_string(), value));
        }
        self
    }

    pub fn opt(self, key: &str, value: Option<impl Display>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    /// Appends the query to `path`.
    pub fn apply(self, path: &str) -> String {
        if self.pairs.is_empty() {
            return path.to_string();
        }

        let query = self
            .pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let separator = if path.contains('?') { '&' } else { '?' };
        format!("{}{}{}", path, separator, query)
    }
}

/// Percent-encodes one path segment (ids, tokens).
pub fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// Splits a comma-separated list, trimming entries and dropping empties.
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Trims and drops empty strings.
pub fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn total_pages(total_count: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_count.div_ceil(u64::from(page_size))
}

/// Short, non-reversible rendering of a token for display.
pub fn mask_token(token: &str) -> String {
    let prefix: String = token.chars().take(6).collect();
    format!("{}… ({} chars)", prefix, token.chars().count())
}

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// MIME type used for multipart uploads.
pub fn content_type_for(filename: &str) -> &'static str {
    match get_file_extension(filename).as_deref() {
        Some("pdf") => "application/pdf",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("doc") => "application/msword",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_encodes_and_skips_empty() {
        let url = Query::new()
            .param("page", 1)
            .param("pageSize", 20)
            .param("search", "C# & .NET")
            .param("skills", "")
            .opt("tier", None::<u8>)
            .apply("/admin/companies");

        assert_eq!(
            url,
            "/admin/companies?page=1&pageSize=20&search=C%23%20%26%20.NET"
        );
    }

    #[test]
    fn test_query_without_params() {
        assert_eq!(Query::new().apply("/shortlists"), "/shortlists");
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list(" Rust, Go ,, TypeScript ,"),
            vec!["Rust", "Go", "TypeScript"]
        );
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  Acme ")), Some("Acme".to_string()));
        assert_eq!(non_empty(Some("   ")), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(41, 20), 3);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_get_file_extension() {
        assert_eq!(get_file_extension("test.pdf"), Some("pdf".to_string()));
        assert_eq!(
            get_file_extension("document.DOCX"),
            Some("docx".to_string())
        );
        assert_eq!(get_file_extension("noext"), None);
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("cv.PDF"), "application/pdf");
        assert_eq!(content_type_for("blob"), "application/octet-stream");
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("abcdefghij"), "abcdef… (10 chars)");
    }
}
