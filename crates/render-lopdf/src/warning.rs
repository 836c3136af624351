use std::fmt;

const MAX_REFERENCE_CHARS: usize = 64;

/// A problem the renderer worked around. Rendering still succeeds.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderWarning {
    /// An image could not be loaded or decoded; the placeholder was drawn.
    AssetUnavailable {
        field: String,
        reference: String,
        reason: String,
    },
    /// A field's box was moved or shrunk to fit on its page.
    GeometryClamped { field: String, page: usize },
    /// The page background could not be used; blank A4 pages were drawn.
    BasePdfUnavailable { reason: String },
}

impl fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderWarning::AssetUnavailable {
                field,
                reference,
                reason,
            } => write!(
                f,
                "image for field '{}' unavailable ({}): {}",
                field, reference, reason
            ),
            RenderWarning::GeometryClamped { field, page } => {
                write!(f, "field '{}' clamped to page {}", field, page + 1)
            }
            RenderWarning::BasePdfUnavailable { reason } => {
                write!(f, "base PDF unavailable: {}", reason)
            }
        }
    }
}

/// Shortens long references, such as data URIs, for messages.
pub(crate) fn abbreviate(reference: &str) -> String {
    if reference.chars().count() <= MAX_REFERENCE_CHARS {
        return reference.to_string();
    }
    let head: String = reference.chars().take(MAX_REFERENCE_CHARS).collect();
    format!("{}...", head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbreviate() {
        assert_eq!(abbreviate("/uploads/a.png"), "/uploads/a.png");
        let uri = format!("data:image/png;base64,{}", "A".repeat(500));
        let short = abbreviate(&uri);
        assert_eq!(short.len(), MAX_REFERENCE_CHARS + 3);
        assert!(short.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_display() {
        let warning = RenderWarning::GeometryClamped {
            field: "photo".into(),
            page: 0,
        };
        assert_eq!(warning.to_string(), "field 'photo' clamped to page 1");
    }
}
