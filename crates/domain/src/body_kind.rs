//! Response body classification
//!
//! Every observed response is classified exactly once into a `BodyKind`.
//! The kind selects the comparison strategy, the sidecar file extension and
//! the way a fixture is rewritten in update mode.

use mime::Mime;

/// Closed set of body comparison strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    /// `text/plain`
    Text,
    /// `text/html`
    Html,
    /// `text/css`
    Css,
    /// JSON content served to a JSONP-style path.
    Jsonp,
    /// Any JSON content type.
    Json,
    /// `text/javascript`
    Js,
    /// PNG image.
    Png,
    /// JPEG image.
    Jpg,
    /// Protocol buffer payload.
    Pbf,
    /// KML document.
    Kml,
    /// No body comparison is performed.
    Unclassified,
}

impl BodyKind {
    /// Classifies a response from its content-type header and the request path.
    ///
    /// JSON responses count as JSONP when the path contains `jsonp` or a
    /// `callback=` parameter.
    #[must_use]
    pub fn classify(content_type: Option<&str>, request_path: &str) -> Self {
        let Some(content_type) = content_type else {
            return Self::Unclassified;
        };
        let essence = content_type.parse::<Mime>().map_or_else(
            |_| content_type.trim().to_ascii_lowercase(),
            |m| m.essence_str().to_ascii_lowercase(),
        );

        if essence.contains("text/plain") {
            Self::Text
        } else if essence.contains("text/html") {
            Self::Html
        } else if essence.contains("text/css") {
            Self::Css
        } else if essence.contains("json") {
            if is_jsonp_path(request_path) {
                Self::Jsonp
            } else {
                Self::Json
            }
        } else if essence.contains("text/javascript") {
            Self::Js
        } else if essence.contains("png") {
            Self::Png
        } else if essence.contains("jpeg") {
            Self::Jpg
        } else if essence.contains("protobuf") {
            Self::Pbf
        } else if essence.contains("kml") {
            Self::Kml
        } else {
            Self::Unclassified
        }
    }

    /// Extension appended to the fixture path to locate the sidecar body file.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Text => ".txt",
            Self::Html => ".html",
            Self::Css => ".css",
            Self::Jsonp => ".jsonp",
            Self::Json => ".json",
            Self::Js => ".js",
            Self::Png => ".png",
            Self::Jpg => ".jpg",
            Self::Pbf => ".pbf",
            Self::Kml => ".kml",
            Self::Unclassified => ".body",
        }
    }

    /// Returns true for kinds compared with the image tolerance check.
    #[must_use]
    pub const fn is_image(self) -> bool {
        matches!(self, Self::Png | Self::Jpg)
    }

    /// Returns true for kinds whose body is raw bytes rather than text.
    #[must_use]
    pub const fn is_binary(self) -> bool {
        matches!(self, Self::Png | Self::Jpg | Self::Pbf)
    }
}

fn is_jsonp_path(path: &str) -> bool {
    path.contains("jsonp") || path.contains("callback=")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_text_types() {
        assert_eq!(BodyKind::classify(Some("text/plain; charset=utf-8"), "/"), BodyKind::Text);
        assert_eq!(BodyKind::classify(Some("text/html"), "/"), BodyKind::Html);
        assert_eq!(BodyKind::classify(Some("text/css"), "/"), BodyKind::Css);
        assert_eq!(BodyKind::classify(Some("text/javascript"), "/"), BodyKind::Js);
    }

    #[test]
    fn test_classify_json_and_jsonp() {
        assert_eq!(BodyKind::classify(Some("application/json"), "/a"), BodyKind::Json);
        assert_eq!(
            BodyKind::classify(Some("application/vnd.geo+json"), "/a"),
            BodyKind::Json
        );
        assert_eq!(
            BodyKind::classify(Some("application/json"), "/a?callback=cb"),
            BodyKind::Jsonp
        );
        assert_eq!(
            BodyKind::classify(Some("application/json"), "/tiles.jsonp"),
            BodyKind::Jsonp
        );
        // JSONP paths only matter for JSON content.
        assert_eq!(
            BodyKind::classify(Some("text/javascript"), "/a?callback=cb"),
            BodyKind::Js
        );
    }

    #[test]
    fn test_classify_binary_types() {
        assert_eq!(BodyKind::classify(Some("image/png"), "/"), BodyKind::Png);
        assert_eq!(BodyKind::classify(Some("image/jpeg"), "/"), BodyKind::Jpg);
        assert_eq!(
            BodyKind::classify(Some("application/x-protobuf"), "/"),
            BodyKind::Pbf
        );
        assert_eq!(
            BodyKind::classify(Some("application/vnd.google-earth.kml+xml"), "/"),
            BodyKind::Kml
        );
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(BodyKind::classify(None, "/"), BodyKind::Unclassified);
        assert_eq!(
            BodyKind::classify(Some("application/octet-stream"), "/"),
            BodyKind::Unclassified
        );
    }

    #[test]
    fn test_extensions() {
        assert_eq!(BodyKind::Jsonp.extension(), ".jsonp");
        assert_eq!(BodyKind::Jpg.extension(), ".jpg");
        assert_eq!(BodyKind::Unclassified.extension(), ".body");
        assert!(BodyKind::Png.is_image());
        assert!(!BodyKind::Pbf.is_image());
        assert!(BodyKind::Pbf.is_binary());
    }
}
