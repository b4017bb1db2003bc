//! Member accessor and archive function bodies for a class.
//!
//! Each function returns the generated lines without indentation; callers
//! decide where in the class body they go.

use crate::model::ClassData;

/// `T getname() const { return name; }` for every member tagged `get`
pub fn getter_lines(class: &ClassData) -> Vec<String> {
    class
        .members
        .iter()
        .filter(|m| m.generate_getter)
        .map(|m| {
            format!(
                "{} get{}() const {{ return {}; }}",
                m.type_name, m.name, m.name
            )
        })
        .collect()
}

/// `void setname(const T& val) { name = val; }` for every member tagged `set`
pub fn setter_lines(class: &ClassData) -> Vec<String> {
    class
        .members
        .iter()
        .filter(|m| m.generate_setter)
        .map(|m| {
            format!(
                "void set{}(const {}& val) {{ {} = val; }}",
                m.name, m.type_name, m.name
            )
        })
        .collect()
}

/// Templated `save` writing each serializable member as a named value.
///
/// A class tagged `[[cereal]]` serializes every member; otherwise only the
/// members tagged individually are written.
pub fn save_lines(class: &ClassData) -> Vec<String> {
    let mut lines = vec![
        "template <typename Archive>".to_string(),
        "void save(Archive& ar) const {".to_string(),
    ];
    lines.extend(
        class
            .serializable_members()
            .map(|m| format!("ar(cereal::make_nvp(\"{}\",{}));", m.name, m.name)),
    );
    lines.push("}".to_string());
    lines
}

/// Templated `load` reading the same members [`save_lines`] writes
pub fn load_lines(class: &ClassData) -> Vec<String> {
    let mut lines = vec![
        "template <typename Archive>".to_string(),
        "void load(Archive& ar) {".to_string(),
    ];
    lines.extend(
        class
            .serializable_members()
            .map(|m| format!("ar({});", m.name)),
    );
    lines.push("}".to_string());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MemberData;

    fn address() -> ClassData {
        ClassData::new("Address").with_members(vec![
            MemberData::new("std::string", "city")
                .serializable()
                .with_getter()
                .with_setter(),
            MemberData::new("int", "zip").with_getter(),
            MemberData::new("bool", "dirty"),
        ])
    }

    #[test]
    fn test_getters_only_for_tagged_members() {
        let lines = getter_lines(&address());
        assert_eq!(
            lines,
            vec![
                "std::string getcity() const { return city; }",
                "int getzip() const { return zip; }",
            ]
        );
    }

    #[test]
    fn test_setters_only_for_tagged_members() {
        let lines = setter_lines(&address());
        assert_eq!(
            lines,
            vec!["void setcity(const std::string& val) { city = val; }"]
        );
    }

    #[test]
    fn test_save_and_load_use_member_tags() {
        let class = address();
        let save = save_lines(&class);
        assert_eq!(save[1], "void save(Archive& ar) const {");
        assert_eq!(save[2], "ar(cereal::make_nvp(\"city\",city));");
        assert_eq!(save.len(), 4);

        let load = load_lines(&class);
        assert_eq!(load[2], "ar(city);");
        assert_eq!(load.last().unwrap(), "}");
    }

    #[test]
    fn test_serializable_class_writes_every_member() {
        let class = address().serializable();
        let load = load_lines(&class);
        assert_eq!(&load[2..5], &["ar(city);", "ar(zip);", "ar(dirty);"]);
    }
}
