#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssetPaths {
    base_path: String,
}

impl AssetPaths {
    pub fn new(base_path: &str) -> Self {
        Self {
            base_path: normalize_base_path(base_path),
        }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn resolve(&self, path: &str) -> String {
        let path = path.trim();
        if path.is_empty() {
            return if self.base_path.is_empty() {
                "/".to_string()
            } else {
                format!("{}/", self.base_path)
            };
        }

        if path.starts_with("http://") || path.starts_with("https://") || path.starts_with("data:") {
            return path.to_string();
        }

        if path.starts_with('/') {
            format!("{}{path}", self.base_path)
        } else {
            format!("{}/{path}", self.base_path)
        }
    }
}

pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_build_has_no_prefix() {
        let assets = AssetPaths::new("");

        assert_eq!(assets.resolve("/profilePic.jpg"), "/profilePic.jpg");
        assert_eq!(assets.resolve(""), "/");
    }

    #[test]
    fn production_build_prefixes_sub_path() {
        let assets = AssetPaths::new("/limson-portfolio/");

        assert_eq!(assets.base_path(), "/limson-portfolio");
        assert_eq!(assets.resolve("/profilePic.jpg"), "/limson-portfolio/profilePic.jpg");
        assert_eq!(assets.resolve("resume.pdf"), "/limson-portfolio/resume.pdf");
    }

    #[test]
    fn absolute_urls_pass_through() {
        let assets = AssetPaths::new("site");

        assert_eq!(
            assets.resolve("https://example.com/og.png"),
            "https://example.com/og.png"
        );
    }

    #[test]
    fn base_path_normalization_collapses_slashes() {
        assert_eq!(normalize_base_path("  "), "");
        assert_eq!(normalize_base_path("/"), "");
        assert_eq!(normalize_base_path("portfolio"), "/portfolio");
        assert_eq!(normalize_base_path("//portfolio//"), "/portfolio");
    }
}
