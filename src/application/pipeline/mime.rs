pub const GENERIC_BINARY: &str = "application/octet-stream";

/// Content type for a known extension (case-insensitive, without the dot).
fn mime_for_extension(extension: &str) -> Option<&'static str> {
    let mime = match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" | "jfif" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "heic" => "image/heic",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "txt" | "log" => "text/plain",
        "csv" => "text/csv",
        "json" => "application/json",
        "xml" => "application/xml",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "html" | "htm" => "text/html",
        "js" => "text/javascript",
        "exe" | "dll" => "application/x-msdownload",
        "sh" => "application/x-sh",
        _ => return None,
    };
    Some(mime)
}

/// Strips parameters and validates the `type/subtype` shape of a transport header.
fn normalize_hint(hint: &str) -> Option<String> {
    let essence = hint.split(';').next()?.trim().to_ascii_lowercase();
    let (kind, subtype) = essence.split_once('/')?;
    let valid = |part: &str| {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "!#$&-^_.+".contains(c))
    };
    if valid(kind) && valid(subtype) {
        Some(essence)
    } else {
        None
    }
}

/// Resolves a content type, trusting the extension over the transport header.
#[derive(Debug, Clone, Copy, Default)]
pub struct MimeResolver;

impl MimeResolver {
    pub fn resolve(&self, file_name: &str, transport_hint: Option<&str>) -> String {
        let from_extension = file_name
            .rsplit_once('.')
            .filter(|(stem, _)| !stem.is_empty())
            .and_then(|(_, extension)| mime_for_extension(extension));

        if let Some(mime) = from_extension {
            return mime.to_string();
        }

        transport_hint
            .and_then(normalize_hint)
            .unwrap_or_else(|| GENERIC_BINARY.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_wins_over_transport_hint() {
        let resolver = MimeResolver;
        assert_eq!(
            resolver.resolve("photo.JPG", Some("application/octet-stream")),
            "image/jpeg"
        );
        assert_eq!(resolver.resolve("report.pdf", Some("binary/octet-stream")), "application/pdf");
    }

    #[test]
    fn unknown_extension_falls_back_to_hint() {
        let resolver = MimeResolver;
        assert_eq!(
            resolver.resolve("scan.raw", Some("Image/X-Raw; charset=binary")),
            "image/x-raw"
        );
        assert_eq!(resolver.resolve("README", Some("text/markdown")), "text/markdown");
    }

    #[test]
    fn hidden_file_is_not_an_extension() {
        assert_eq!(MimeResolver.resolve(".png", None), GENERIC_BINARY);
    }

    #[test]
    fn malformed_hint_resolves_to_generic_binary() {
        let resolver = MimeResolver;
        assert_eq!(resolver.resolve("blob", None), GENERIC_BINARY);
        assert_eq!(resolver.resolve("blob", Some("nonsense")), GENERIC_BINARY);
        assert_eq!(resolver.resolve("blob", Some("text/ html")), GENERIC_BINARY);
        assert_eq!(resolver.resolve("blob", Some("/png")), GENERIC_BINARY);
    }
}
