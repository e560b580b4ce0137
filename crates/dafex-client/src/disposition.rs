//! `Content-Disposition` filename extraction.

/// Extracts the filename from a `Content-Disposition` header value.
///
/// The service sends `attachment; filename="<name>"`; the filename is the
/// substring between `filename="` and the next `"`. Returns `None` when the
/// header is absent, carries no quoted filename, or the quoted value is
/// empty; callers fall back to a workflow-specific default name.
#[must_use]
pub fn filename_from_disposition(header: Option<&str>) -> Option<String> {
    let header = header?;
    let start = header.find("filename=\"")? + "filename=\"".len();
    let rest = &header[start..];
    let end = rest.find('"')?;
    if end == 0 {
        return None;
    }
    Some(rest[..end].to_owned())
}
