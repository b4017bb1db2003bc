//! Interpretation of `[[...]]` annotation text.

/// Keywords found in one annotation
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AnnotationFlags {
    /// `cereal`: include in generated save/load
    pub cereal: bool,
    /// `get`: generate a getter
    pub get: bool,
    /// `set`: generate a setter
    pub set: bool,
}

impl AnnotationFlags {
    /// Scan annotation text for whole-word keywords.
    ///
    /// Words are split on anything that cannot appear in an identifier, so
    /// `cereal,get`, `cereal, set` and `get(x)` all work while `getter` and
    /// `nodiscard` do not match. Unrecognized words are ignored.
    pub fn parse(text: &str) -> Self {
        let mut flags = Self::default();
        for word in text.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_')) {
            match word {
                "cereal" => flags.cereal = true,
                "get" => flags.get = true,
                "set" => flags.set = true,
                _ => {}
            }
        }
        flags
    }

    pub fn is_empty(&self) -> bool {
        !(self.cereal || self.get || self.set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_keywords() {
        let flags = AnnotationFlags::parse("cereal, get,set");
        assert!(flags.cereal && flags.get && flags.set);
    }

    #[test]
    fn test_whole_words_only() {
        let flags = AnnotationFlags::parse("nodiscard, getter, settings");
        assert!(flags.is_empty());
    }

    #[test]
    fn test_single_keyword() {
        assert_eq!(
            AnnotationFlags::parse(" get "),
            AnnotationFlags {
                get: true,
                ..Default::default()
            }
        );
    }
}
