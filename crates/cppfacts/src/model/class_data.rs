use super::namespace::{join_namespace, qualify};
use super::visibility::Visibility;
use serde::{Deserialize, Serialize};

/// Represents a class/struct data member
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberData {
    /// Declared type, whitespace-normalized (e.g. `std::vector<int>`)
    #[serde(rename = "type")]
    pub type_name: String,

    /// Member name
    pub name: String,

    /// Access level in effect where the member was declared
    pub visibility: Visibility,

    /// Declared with a leading `const`
    pub is_const: bool,

    /// Declared `static`
    pub is_static: bool,

    /// Include in generated save/load functions
    pub serializable: bool,

    /// Generate a getter for this member
    pub generate_getter: bool,

    /// Generate a setter for this member
    pub generate_setter: bool,
}

impl MemberData {
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
            visibility: Visibility::Private,
            is_const: false,
            is_static: false,
            serializable: false,
            generate_getter: false,
            generate_setter: false,
        }
    }

    pub fn with_visibility(mut self, vis: Visibility) -> Self {
        self.visibility = vis;
        self
    }

    pub fn const_member(mut self) -> Self {
        self.is_const = true;
        self
    }

    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn serializable(mut self) -> Self {
        self.serializable = true;
        self
    }

    pub fn with_getter(mut self) -> Self {
        self.generate_getter = true;
        self
    }

    pub fn with_setter(mut self) -> Self {
        self.generate_setter = true;
        self
    }
}

/// Represents one method declared in a class body.
///
/// Constructors and destructors are never recorded here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodData {
    pub return_type: String,
    pub name: String,
    pub visibility: Visibility,
    /// Leading `const` or trailing `const` qualifier
    pub is_const: bool,
    pub is_static: bool,
    /// Declared `virtual` or marked `override`
    pub is_virtual: bool,
}

impl MethodData {
    pub fn new(return_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            return_type: return_type.into(),
            name: name.into(),
            visibility: Visibility::Private,
            is_const: false,
            is_static: false,
            is_virtual: false,
        }
    }

    pub fn with_visibility(mut self, vis: Visibility) -> Self {
        self.visibility = vis;
        self
    }

    pub fn const_method(mut self) -> Self {
        self.is_const = true;
        self
    }

    pub fn static_method(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn virtual_method(mut self) -> Self {
        self.is_virtual = true;
        self
    }
}

/// Represents a class or struct declaration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassData {
    /// Enclosing namespace segments, outermost first
    pub namespaces: Vec<String>,

    /// Class name
    pub name: String,

    /// Base classes in declaration order (inheritance access is not kept)
    pub parents: Vec<String>,

    /// Data members in declaration order
    pub members: Vec<MemberData>,

    /// Methods in declaration order
    pub methods: Vec<MethodData>,

    /// Declared with `struct`
    pub is_struct: bool,

    /// Whole class tagged `[[cereal]]`
    pub serializable: bool,
}

impl ClassData {
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

    pub fn structure(mut self) -> Self {
        self.is_struct = true;
        self
    }

    pub fn with_parents(mut self, parents: Vec<String>) -> Self {
        self.parents = parents;
        self
    }

    pub fn with_members(mut self, members: Vec<MemberData>) -> Self {
        self.members = members;
        self
    }

    pub fn with_methods(mut self, methods: Vec<MethodData>) -> Self {
        self.methods = methods;
        self
    }

    pub fn serializable(mut self) -> Self {
        self.serializable = true;
        self
    }

    /// Namespace path plus class name
    pub fn full_class_name(&self) -> String {
        qualify(&self.namespaces, &self.name)
    }

    /// The `::`-joined namespace, empty for a global class
    pub fn class_namespace(&self) -> String {
        join_namespace(&self.namespaces)
    }

    /// Members that belong in generated save/load functions
    pub fn serializable_members(&self) -> impl Iterator<Item = &MemberData> {
        self.members
            .iter()
            .filter(move |m| m.serializable || self.serializable)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
