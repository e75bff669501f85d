/// Configuration for a single parse.
///
/// # Example
///
/// ```
/// use pugparse::ParserOptions;
///
/// let options = ParserOptions::new().with_filename("views/index.pug");
/// assert_eq!(options.filename.as_deref(), Some("views/index.pug"));
/// assert_eq!(options.extension, ".pug");
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParserOptions {
    /// Recorded on every node and error; never opened.
    pub filename: Option<String>,
    /// Includes ending in this extension are parsed as templates.
    pub extension: String,
    /// Also parsed as templates, with a deprecation warning.
    pub legacy_extensions: Vec<String>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            filename: None,
            extension: ".pug".to_owned(),
            legacy_extensions: vec![".jade".to_owned()],
        }
    }
}

/// How an include path relates to the template language.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum IncludeTarget {
    Template,
    LegacyTemplate,
    Raw,
}

impl ParserOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filename<T: Into<String>>(mut self, filename: T) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_extension<T: Into<String>>(mut self, extension: T) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_legacy_extensions<I, T>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.legacy_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Empty extensions never match.
    pub(crate) fn include_target(&self, path: &str) -> IncludeTarget {
        let matches = |ext: &str| !ext.is_empty() && path.ends_with(ext);
        if matches(&self.extension) {
            IncludeTarget::Template
        } else if self.legacy_extensions.iter().any(|ext| matches(ext)) {
            IncludeTarget::LegacyTemplate
        } else {
            IncludeTarget::Raw
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ntest::timeout(100)]
    fn test_include_target() {
        let options = ParserOptions::default();
        assert_eq!(options.include_target("header.pug"), IncludeTarget::Template);
        assert_eq!(options.include_target("old.jade"), IncludeTarget::LegacyTemplate);
        assert_eq!(options.include_target("style.css"), IncludeTarget::Raw);
        assert_eq!(options.include_target("pug"), IncludeTarget::Raw);
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_custom_extensions() {
        let options = ParserOptions::new()
            .with_extension(".tpl")
            .with_legacy_extensions(Vec::<String>::new());
        assert_eq!(options.include_target("a.tpl"), IncludeTarget::Template);
        assert_eq!(options.include_target("a.jade"), IncludeTarget::Raw);
        assert_eq!(options.include_target("a.pug"), IncludeTarget::Raw);
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_empty_extension_never_matches() {
        let options = ParserOptions::new()
            .with_extension("")
            .with_legacy_extensions(["", ".jade"]);
        assert_eq!(options.include_target("style.css"), IncludeTarget::Raw);
        assert_eq!(options.include_target("a.pug"), IncludeTarget::Raw);
        assert_eq!(options.include_target("a.jade"), IncludeTarget::LegacyTemplate);
    }
}
