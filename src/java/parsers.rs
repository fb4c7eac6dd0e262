#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use crate::java::surface::{JavaType, Primitive};

#[derive(Debug, Clone, PartialEq, Eq)]
/// A parsed JVM method descriptor.
pub struct MethodDescriptor {
    /// Parameter types in order.
    pub params:      Vec<JavaType>,
    /// Return type (`JavaType::Void` for `V`).
    pub return_type: JavaType,
}

peg::parser! {
    /// Grammars for JVM type and method descriptors (JVMS §4.3).
    pub grammar parser() for str {
        /// matches a single base type character
        rule base_type() -> JavaType
            = "B" { JavaType::Primitive(Primitive::Byte) }
            / "C" { JavaType::Primitive(Primitive::Char) }
            / "D" { JavaType::Primitive(Primitive::Double) }
            / "F" { JavaType::Primitive(Primitive::Float) }
            / "I" { JavaType::Primitive(Primitive::Int) }
            / "J" { JavaType::Primitive(Primitive::Long) }
            / "S" { JavaType::Primitive(Primitive::Short) }
            / "Z" { JavaType::Primitive(Primitive::Boolean) }

        /// matches an internal class name terminated by `;`
        rule object_type() -> JavaType
            = "L" n:$([^ ';' | '[' | '.']+) ";" { JavaType::Object(n.replace('/', ".")) }

        /// matches one array dimension followed by its component type
        rule array_type() -> JavaType
            = "[" t:field_type() { JavaType::Array(Box::new(t)) }

        /// parses a field descriptor such as `[Ljava/lang/String;`
        pub rule field_type() -> JavaType
            = base_type() / object_type() / array_type()

        /// matches `V` or any field type
        rule return_type() -> JavaType
            = "V" { JavaType::Void }
            / field_type()

        /// parses a full method descriptor such as `(I[J)Ljava/lang/Object;`
        pub rule method_descriptor() -> MethodDescriptor
            = "(" params:field_type()* ")" ret:return_type()
            { MethodDescriptor { params, return_type: ret } }
    }
}

/// Converts an internal class name (`java/lang/Exception`) to its dotted form.
pub fn internal_to_dotted(name: &str) -> String {
    name.replace('/', ".")
}

/// Converts an annotation type descriptor (`Lpkg/Skip;`) to a dotted name.
/// Anything that is not an object descriptor is returned unchanged.
pub fn descriptor_to_dotted(descriptor: &str) -> String {
    match parser::field_type(descriptor) {
        Ok(JavaType::Object(name)) => name,
        _ => descriptor.to_string(),
    }
}
