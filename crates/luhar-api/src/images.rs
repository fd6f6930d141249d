//! Image CDN URL composition.

/// Poster / profile sizes served by the image CDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    /// Cast thumbnails.
    W92,
    /// Recommendation and filmography posters.
    W185,
    /// Person profile picture.
    W300,
    /// Movie cards and the detail poster.
    W500,
    /// Detail backdrop.
    W1280,
}

impl ImageSize {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::W92 => "w92",
            Self::W185 => "w185",
            Self::W300 => "w300",
            Self::W500 => "w500",
            Self::W1280 => "w1280",
        }
    }

    /// Placeholder dimensions (2:3 portrait, 16:9 for backdrops).
    fn placeholder_dims(self) -> (u32, u32) {
        match self {
            Self::W92 => (92, 138),
            Self::W185 => (185, 278),
            Self::W300 => (300, 450),
            Self::W500 => (500, 750),
            Self::W1280 => (1280, 720),
        }
    }

    /// Cast thumbnails say "No Pic"; everything else "No Image".
    fn missing_text(self) -> &'static str {
        match self {
            Self::W92 => "No+Pic",
            _ => "No+Image",
        }
    }
}

/// Builds image URLs against a CDN base and a placeholder service.
#[derive(Debug, Clone)]
pub struct ImageUrls {
    base_url: String,
    placeholder_url: String,
}

impl Default for ImageUrls {
    fn default() -> Self {
        Self::new("https://image.tmdb.org/t/p", "https://placehold.co")
    }
}

impl ImageUrls {
    pub fn new(base_url: impl Into<String>, placeholder_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            placeholder_url: placeholder_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// CDN URL for `path`, or the "no image" placeholder when it is absent.
    pub fn url(&self, size: ImageSize, path: Option<&str>) -> String {
        match path.filter(|p| !p.is_empty()) {
            Some(path) => self.cdn(size, path),
            None => self.placeholder(size, size.missing_text()),
        }
    }

    /// CDN URL for `path`, or `None` when it is absent. Used for backdrops,
    /// which have no placeholder.
    pub fn optional(&self, size: ImageSize, path: Option<&str>) -> Option<String> {
        path.filter(|p| !p.is_empty()).map(|p| self.cdn(size, p))
    }

    /// Shown when an image URL fails to load.
    pub fn error_fallback(&self, size: ImageSize) -> String {
        self.placeholder(size, "Image+Error")
    }

    fn cdn(&self, size: ImageSize, path: &str) -> String {
        format!("{}/{}{path}", self.base_url, size.as_str())
    }

    fn placeholder(&self, size: ImageSize, text: &str) -> String {
        let (w, h) = size.placeholder_dims();
        format!("{}/{w}x{h}?text={text}", self.placeholder_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cdn_url() {
        let urls = ImageUrls::default();
        assert_eq!(
            urls.url(ImageSize::W500, Some("/abc.jpg")),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
        assert_eq!(
            urls.optional(ImageSize::W1280, Some("/bd.jpg")).as_deref(),
            Some("https://image.tmdb.org/t/p/w1280/bd.jpg")
        );
    }

    #[test]
    fn test_missing_path_placeholders() {
        let urls = ImageUrls::default();
        assert_eq!(
            urls.url(ImageSize::W500, None),
            "https://placehold.co/500x750?text=No+Image"
        );
        assert_eq!(
            urls.url(ImageSize::W92, Some("")),
            "https://placehold.co/92x138?text=No+Pic"
        );
        assert_eq!(
            urls.url(ImageSize::W185, None),
            "https://placehold.co/185x278?text=No+Image"
        );
        assert_eq!(urls.optional(ImageSize::W1280, None), None);
    }

    #[test]
    fn test_error_fallback() {
        let urls = ImageUrls::new("https://cdn.example/t/p/", "https://ph.example/");
        assert_eq!(
            urls.error_fallback(ImageSize::W300),
            "https://ph.example/300x450?text=Image+Error"
        );
        assert_eq!(
            urls.url(ImageSize::W300, Some("/p.jpg")),
            "https://cdn.example/t/p/w300/p.jpg"
        );
    }
}
