#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    collections::{BTreeSet, HashMap},
    fmt::{self, Display},
};

use itertools::Itertools;
use serde::{Serialize, Serializer};
use typed_builder::TypedBuilder;

/// File extension of compiled Java classes.
pub const CLASS_EXTENSION: &str = ".class";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Location of a compiled class: its package segments and its binary simple
/// name (nested classes keep their `Outer$Inner` form).
pub struct ClassPath {
    /// Package segments, outermost first. Empty for the default package.
    package: Vec<String>,
    /// Simple (binary) name of the class.
    name:    String,
}

impl ClassPath {
    /// Creates a class path from package segments and a simple name.
    pub fn new(package: Vec<String>, name: impl Into<String>) -> Self {
        Self {
            package,
            name: name.into(),
        }
    }

    /// Parses a `/` or `\` separated path such as `a/b/Foo.class` or `a/b/Foo`.
    ///
    /// Returns `None` for paths with an empty final segment, including a bare
    /// `.class` file name.
    pub fn parse(path: &str) -> Option<Self> {
        let normalized = path.replace('\\', "/");
        let stripped = normalized
            .strip_suffix(CLASS_EXTENSION)
            .unwrap_or(&normalized);
        if stripped.is_empty() || stripped.ends_with('/') {
            return None;
        }
        let trimmed = stripped.trim_start_matches('/');

        let mut segments: Vec<String> = trimmed
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .map(str::to_string)
            .collect();
        let name = segments.pop()?;

        Some(Self {
            package: segments,
            name,
        })
    }

    /// Package segments, outermost first.
    pub fn package(&self) -> &[String] {
        &self.package
    }

    /// Simple (binary) name of the class.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True for classes in the unnamed package.
    pub fn in_default_package(&self) -> bool {
        self.package.is_empty()
    }

    /// Package prefix with a trailing separator, e.g. `a/b/`. Empty for the
    /// default package.
    pub fn package_prefix(&self) -> String {
        self.package.iter().map(|s| format!("{s}/")).collect()
    }

    /// Package in dotted form, e.g. `a.b`.
    pub fn dotted_package(&self) -> String {
        self.package.join(".")
    }

    /// Fully qualified dotted name, e.g. `a.b.Foo`.
    pub fn dotted(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.dotted_package(), self.name)
        }
    }
}

impl Display for ClassPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.package_prefix(), self.name)
    }
}

impl Serialize for ClassPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
/// The eight JVM primitive types.
pub enum Primitive {
    /// `byte`
    Byte,
    /// `char`
    Char,
    /// `double`
    Double,
    /// `float`
    Float,
    /// `int`
    Int,
    /// `long`
    Long,
    /// `short`
    Short,
    /// `boolean`
    Boolean,
}

impl Primitive {
    /// Java source keyword for this primitive.
    pub fn as_str(self) -> &'static str {
        match self {
            Primitive::Byte => "byte",
            Primitive::Char => "char",
            Primitive::Double => "double",
            Primitive::Float => "float",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Short => "short",
            Primitive::Boolean => "boolean",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// A type as it appears in a method signature.
pub enum JavaType {
    /// A primitive type.
    Primitive(Primitive),
    /// A class or interface type, fully qualified with `.` separators.
    Object(String),
    /// An array of the inner type.
    Array(Box<JavaType>),
    /// `void`, only valid as a return type.
    Void,
}

impl JavaType {
    /// Fully qualified source form, e.g. `java.lang.String[]`.
    pub fn name(&self) -> String {
        match self {
            JavaType::Primitive(p) => p.as_str().to_string(),
            JavaType::Object(name) => name.clone(),
            JavaType::Array(inner) => format!("{}[]", inner.name()),
            JavaType::Void => "void".to_string(),
        }
    }

    /// Simple source form, e.g. `String[]` or `Map$Entry`.
    pub fn simple_name(&self) -> String {
        match self {
            JavaType::Object(name) => name.rsplit('.').next().unwrap_or(name).to_string(),
            JavaType::Array(inner) => format!("{}[]", inner.simple_name()),
            other => other.name(),
        }
    }
}

impl Display for JavaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl Serialize for JavaType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// Source-level method modifiers, stored as JVM access flag bits.
pub struct Modifiers(u16);

impl Modifiers {
    /// `public`
    pub const PUBLIC: Modifiers = Modifiers(0x0001);
    /// `private`
    pub const PRIVATE: Modifiers = Modifiers(0x0002);
    /// `protected`
    pub const PROTECTED: Modifiers = Modifiers(0x0004);
    /// `static`
    pub const STATIC: Modifiers = Modifiers(0x0008);
    /// `final`
    pub const FINAL: Modifiers = Modifiers(0x0010);
    /// `synchronized`
    pub const SYNCHRONIZED: Modifiers = Modifiers(0x0020);
    /// `native`
    pub const NATIVE: Modifiers = Modifiers(0x0100);
    /// `abstract`
    pub const ABSTRACT: Modifiers = Modifiers(0x0400);
    /// `strictfp`
    pub const STRICT: Modifiers = Modifiers(0x0800);

    /// Every modifier bit a method can carry in source, in canonical order.
    const ORDERED: [(Modifiers, &'static str); 9] = [
        (Modifiers::PUBLIC, "public"),
        (Modifiers::PROTECTED, "protected"),
        (Modifiers::PRIVATE, "private"),
        (Modifiers::ABSTRACT, "abstract"),
        (Modifiers::STATIC, "static"),
        (Modifiers::FINAL, "final"),
        (Modifiers::SYNCHRONIZED, "synchronized"),
        (Modifiers::NATIVE, "native"),
        (Modifiers::STRICT, "strictfp"),
    ];

    /// Bits that correspond to source-level method modifiers. Bridge, varargs
    /// and synthetic bits are compiler artefacts and are dropped.
    const METHOD_MASK: u16 = 0x0D3F;

    /// No modifiers (package-private instance method).
    pub const fn empty() -> Self {
        Modifiers(0)
    }

    /// Builds a modifier set from raw `method_info.access_flags`.
    pub const fn from_access_flags(flags: u16) -> Self {
        Modifiers(flags & Self::METHOD_MASK)
    }

    /// True when no modifier is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every bit of `other` is set in `self`.
    pub const fn contains(self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }

    /// Bits set in `self` but not in `other`.
    pub const fn difference(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 & !other.0)
    }

    /// Modifier keywords in canonical Java order.
    pub fn names(self) -> Vec<&'static str> {
        Self::ORDERED
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

impl Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names().join(" "))
    }
}

impl Serialize for Modifiers {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.names())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TypedBuilder)]
#[builder(doc)]
/// The structural signature of one declared method.
pub struct MemberSignature {
    /// Method name.
    #[builder(setter(into))]
    pub(crate) name:        String,
    /// Parameter types, in declaration order.
    #[builder(default)]
    pub(crate) params:      Vec<JavaType>,
    /// Return type.
    #[builder(default = JavaType::Void)]
    pub(crate) return_type: JavaType,
    /// Declared exception types, fully qualified.
    #[builder(default)]
    pub(crate) exceptions:  BTreeSet<String>,
    /// Source-level modifiers.
    #[builder(default)]
    pub(crate) modifiers:   Modifiers,
    /// Class that declares this method.
    pub(crate) owner:       ClassPath,
    /// Annotation type names on the method, dotted.
    #[builder(default)]
    pub(crate) annotations: Vec<String>,
    /// Whether the method carries the exclusion marker.
    #[builder(default)]
    pub(crate) excluded:    bool,
}

impl MemberSignature {
    /// Method name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter types, in declaration order.
    pub fn params(&self) -> &[JavaType] {
        &self.params
    }

    /// Return type.
    pub fn return_type(&self) -> &JavaType {
        &self.return_type
    }

    /// Declared exception types.
    pub fn exceptions(&self) -> &BTreeSet<String> {
        &self.exceptions
    }

    /// Source-level modifiers.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Declaring class.
    pub fn owner(&self) -> &ClassPath {
        &self.owner
    }

    /// Annotation type names on the method.
    pub fn annotations(&self) -> &[String] {
        &self.annotations
    }

    /// Whether the method carries the exclusion marker.
    pub fn is_excluded(&self) -> bool {
        self.excluded
    }

    /// True when `other` has the same name and the exact same parameter type
    /// sequence.
    pub fn same_signature(&self, other: &MemberSignature) -> bool {
        self.name == other.name && self.params == other.params
    }

    /// Human-readable form used in messages, e.g. `doWork(int, String[])`.
    pub fn display(&self) -> String {
        format!(
            "{}({})",
            self.name,
            self.params.iter().map(JavaType::simple_name).join(", ")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TypedBuilder)]
#[builder(doc)]
/// One compiled class and the methods it declares.
pub struct ClassSurface {
    /// Where the class lives.
    pub(crate) path:        ClassPath,
    /// Annotation type names on the class, dotted.
    #[builder(default)]
    pub(crate) annotations: Vec<String>,
    /// Whether the class carries the exclusion marker.
    #[builder(default)]
    pub(crate) excluded:    bool,
    /// Declared methods, in class file order.
    #[builder(default)]
    pub(crate) methods:     Vec<MemberSignature>,
}

impl ClassSurface {
    /// Location of the class.
    pub fn path(&self) -> &ClassPath {
        &self.path
    }

    /// Annotation type names on the class.
    pub fn annotations(&self) -> &[String] {
        &self.annotations
    }

    /// Whether the class carries the exclusion marker.
    pub fn is_excluded(&self) -> bool {
        self.excluded
    }

    /// Declared methods, in class file order.
    pub fn methods(&self) -> &[MemberSignature] {
        &self.methods
    }
}

#[derive(Debug, Clone, Default, Serialize)]
/// The required API: reference classes that survived exclusion filtering, in
/// archive order.
pub struct ReferenceSurface {
    /// Required classes, each holding only its required methods.
    classes: Vec<ClassSurface>,
}

impl ReferenceSurface {
    /// Wraps an already filtered list of classes.
    pub fn new(classes: Vec<ClassSurface>) -> Self {
        Self { classes }
    }

    /// Required classes in reference order.
    pub fn classes(&self) -> &[ClassSurface] {
        &self.classes
    }

    /// Distinct package prefixes, in order of first appearance.
    pub fn package_prefixes(&self) -> Vec<(String, &ClassPath)> {
        self.classes
            .iter()
            .map(|c| (c.path.package_prefix(), &c.path))
            .unique_by(|(prefix, _)| prefix.clone())
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
/// Everything found in a submission's class directory, unfiltered.
pub struct CandidateSurface {
    /// Classes in discovery order.
    classes: Vec<ClassSurface>,
    /// Position of each class in `classes`, keyed by path.
    #[serde(skip)]
    index:   HashMap<ClassPath, usize>,
}

impl CandidateSurface {
    /// Indexes the given classes by path.
    pub fn new(classes: Vec<ClassSurface>) -> Self {
        let index = classes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.path.clone(), i))
            .collect();
        Self { classes, index }
    }

    /// Classes in discovery order.
    pub fn classes(&self) -> &[ClassSurface] {
        &self.classes
    }

    /// Looks a class up by exact path.
    pub fn class(&self, path: &ClassPath) -> Option<&ClassSurface> {
        self.index.get(path).map(|&i| &self.classes[i])
    }

    /// True when a class with exactly this path exists.
    pub fn contains(&self, path: &ClassPath) -> bool {
        self.index.contains_key(path)
    }

    /// True when any candidate class path starts with `prefix`.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.classes
            .iter()
            .any(|c| c.path.to_string().starts_with(prefix))
    }
}
