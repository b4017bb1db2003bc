use super::namespace::{join_namespace, qualify};
use serde::{Deserialize, Serialize};

/// An enum or enum class found in a header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumData {
    /// Enclosing namespace segments, outermost first
    pub namespaces: Vec<String>,

    /// Enum name
    pub name: String,

    /// `enum class` / `enum struct` rather than a plain enum
    pub is_class_enum: bool,

    /// Enumerators in declaration order. Explicit values are not kept.
    pub identifiers: Vec<String>,
}

impl EnumData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_namespaces(mut self, namespaces: Vec<String>) -> Self {
        self.namespaces = namespaces;
        self
    }

    pub fn class_enum(mut self) -> Self {
        self.is_class_enum = true;
        self
    }

    pub fn with_identifiers<I, S>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.identifiers = identifiers.into_iter().map(Into::into).collect();
        self
    }

    /// The `::`-joined namespace, empty for a global enum
    pub fn enum_namespace(&self) -> String {
        join_namespace(&self.namespaces)
    }

    /// Namespace path plus enum name
    pub fn full_name(&self) -> String {
        qualify(&self.namespaces, &self.name)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_builder() {
        let e = EnumData::new("Color")
            .with_namespaces(vec!["foo".into(), "bar".into()])
            .class_enum()
            .with_identifiers(["red", "green"]);

        assert_eq!(e.full_name(), "foo::bar::Color");
        assert_eq!(e.enum_namespace(), "foo::bar");
        assert!(e.is_class_enum);
        assert_eq!(e.identifiers, vec!["red", "green"]);
    }

    #[test]
    fn test_clear() {
        let mut e = EnumData::new("fish").with_identifiers(["trout"]);
        e.clear();
        assert_eq!(e, EnumData::default());
    }

    #[test]
    fn test_json_field_names() {
        let e = EnumData::new("Color").class_enum();
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["isClassEnum"], true);
        assert_eq!(json["name"], "Color");
    }
}
