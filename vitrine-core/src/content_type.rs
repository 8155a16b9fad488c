//! Content-Type detection by file extension.

/// Media types the origin knows how to label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Html,
    JavaScript,
    Css,
    Json,
    Png,
    Jpeg,
    Svg,
    Mp4,
    OctetStream,
}

impl ContentType {
    /// Map a lower-cased extension to its media type.
    pub fn from_extension(extension: &str) -> Self {
        match extension {
            "html" | "htm" => ContentType::Html,
            "js" | "mjs" => ContentType::JavaScript,
            "css" => ContentType::Css,
            "json" => ContentType::Json,
            "png" => ContentType::Png,
            "jpg" | "jpeg" => ContentType::Jpeg,
            "svg" => ContentType::Svg,
            "mp4" => ContentType::Mp4,
            _ => ContentType::OctetStream,
        }
    }

    /// Header value for `Content-Type`.
    pub fn header_value(&self) -> &'static str {
        match self {
            ContentType::Html => "text/html; charset=utf-8",
            ContentType::JavaScript => "text/javascript",
            ContentType::Css => "text/css",
            ContentType::Json => "application/json",
            ContentType::Png => "image/png",
            ContentType::Jpeg => "image/jpeg",
            ContentType::Svg => "image/svg+xml",
            ContentType::Mp4 => "video/mp4",
            ContentType::OctetStream => "application/octet-stream",
        }
    }

    /// HTML goes through the assembler; everything else is served as raw bytes.
    pub fn is_html(&self) -> bool {
        matches!(self, ContentType::Html)
    }
}
