//! `to_string` and `operator<<` generation for enums.
//!
//! Class enums are written as `Qualified::Enum::value`. Plain enums leak
//! their enumerators into the enclosing namespace, so their case labels are
//! qualified by namespace only, and `to_string` returns the bare enumerator.

use crate::model::EnumData;

const GENERATED_BANNER: &str = "/* This is generated code. Do not edit. Unless you really want to. */";

/// Case label for one enumerator
fn case_label(qualified_name: &str, data: &EnumData, identifier: &str) -> String {
    if data.is_class_enum {
        format!("{qualified_name}::{identifier}")
    } else {
        let ns = data.enum_namespace();
        if ns.is_empty() {
            identifier.to_string()
        } else {
            format!("{ns}::{identifier}")
        }
    }
}

/// Header declaring `to_string` and `operator<<` for every enum.
///
/// `enum_header` is the header the enums were parsed from; it is included so
/// the generated declarations can name the enum types.
pub fn generate_header<'a, I>(enums: I, enum_header: &str) -> String
where
    I: IntoIterator<Item = (&'a str, &'a EnumData)>,
{
    let mut out = String::new();
    out.push_str(GENERATED_BANNER);
    out.push_str("\n#pragma once\n#include <string>\n#include <iostream>\n");
    out.push_str(&format!("#include <{enum_header}>\n\n"));

    for (qualified_name, _) in enums {
        out.push_str(&format!(
            "std::string to_string(const {qualified_name}& value); // Converts enum to a string representation\n"
        ));
        out.push_str(&format!(
            "std::ostream& operator<<(std::ostream& stream, const {qualified_name}& value);\n"
        ));
    }
    out
}

/// Source defining the functions declared by [`generate_header`].
pub fn generate_source<'a, I>(enums: I, generated_header: &str) -> String
where
    I: IntoIterator<Item = (&'a str, &'a EnumData)>,
{
    let mut out = String::new();
    out.push_str(GENERATED_BANNER);
    out.push_str(&format!("\n#include <{generated_header}>\n\n"));

    for (qualified_name, data) in enums {
        out.push_str(&format!(
            "std::string to_string(const {qualified_name}& value) {{\n  switch (value) {{\n"
        ));
        for identifier in &data.identifiers {
            let label = case_label(qualified_name, data, identifier);
            let text = if data.is_class_enum {
                label.as_str()
            } else {
                identifier.as_str()
            };
            out.push_str(&format!("    case {label}:\n      return \"{text}\";\n"));
        }
        out.push_str("  }\n  return \"UNKNOWN VALUE\";\n}\n\n");

        out.push_str(&format!(
            "std::ostream& operator<<(std::ostream& stream, const {qualified_name}& value) {{\n  switch (value) {{\n"
        ));
        for identifier in &data.identifiers {
            let label = case_label(qualified_name, data, identifier);
            out.push_str(&format!(
                "    case {label}:\n      stream << \"{label}\";\n      break;\n"
            ));
        }
        out.push_str("    default:\n      stream << \"UNKNOWN VALUE\";\n  }\n  return stream;\n}\n\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trees() -> EnumData {
        EnumData::new("Trees")
            .with_namespaces(vec!["foo".into(), "bar".into()])
            .class_enum()
            .with_identifiers(["theLarch", "larch"])
    }

    fn animals() -> EnumData {
        EnumData::new("Animals")
            .with_namespaces(vec!["animals".into()])
            .with_identifiers(["dog", "cat"])
    }

    #[test]
    fn test_header_declares_each_enum() {
        let trees = trees();
        let header = generate_header([("foo::bar::Trees", &trees)], "enums.h");

        assert!(header.contains("#include <enums.h>"));
        assert!(header.contains("std::string to_string(const foo::bar::Trees& value);"));
        assert!(header.contains("operator<<(std::ostream& stream, const foo::bar::Trees& value);"));
    }

    #[test]
    fn test_class_enum_cases_are_fully_qualified() {
        let trees = trees();
        let source = generate_source([("foo::bar::Trees", &trees)], "enums_gen.h");

        assert!(source.contains("case foo::bar::Trees::theLarch:"));
        assert!(source.contains("return \"foo::bar::Trees::larch\";"));
    }

    #[test]
    fn test_plain_enum_cases_use_namespace() {
        let animals = animals();
        let source = generate_source([("animals::Animals", &animals)], "enums_gen.h");

        assert!(source.contains("case animals::dog:"));
        assert!(source.contains("return \"dog\";"));
        assert!(source.contains("stream << \"animals::cat\";"));
    }

    #[test]
    fn test_global_plain_enum() {
        let colors = EnumData::new("Colors").with_identifiers(["red"]);
        let source = generate_source([("Colors", &colors)], "enums_gen.h");
        assert!(source.contains("case red:"));
    }
}
