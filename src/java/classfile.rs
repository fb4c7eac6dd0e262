#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! A structural reader for the JVM class file format.
//!
//! Only what the verifier needs is kept: the class name and access flags,
//! annotation type names, and each method's name, descriptor, access flags,
//! declared exceptions and annotation type names. Field and code attributes
//! are skipped.

use bytes::Buf;

use super::parsers::{MethodDescriptor, descriptor_to_dotted, internal_to_dotted, parser};

/// `0xCAFEBABE`
const MAGIC: u32 = 0xCAFE_BABE;

/// `ACC_SYNTHETIC`, shared by classes and methods.
pub const ACC_SYNTHETIC: u16 = 0x1000;

/// Attribute holding the `throws` clause of a method.
const EXCEPTIONS_ATTR: &str = "Exceptions";
/// Attribute holding annotations with RUNTIME retention.
const VISIBLE_ANNOTATIONS_ATTR: &str = "RuntimeVisibleAnnotations";
/// Attribute holding annotations with CLASS retention.
const INVISIBLE_ANNOTATIONS_ATTR: &str = "RuntimeInvisibleAnnotations";

/// Errors raised while reading a class file.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassFormatError {
    /// The first four bytes were not `0xCAFEBABE`.
    #[error("bad magic number {0:#010x}")]
    BadMagic(u32),
    /// The input ended before a structure was complete.
    #[error("unexpected end of class file while reading {0}")]
    Truncated(&'static str),
    /// A constant pool entry had an unknown tag.
    #[error("unknown constant pool tag {tag} at index {index}")]
    UnknownTag {
        /// the offending tag byte
        tag:   u8,
        /// constant pool index
        index: u16,
    },
    /// A constant pool reference pointed at the wrong kind of entry.
    #[error("constant pool index {index} is not a {expected}")]
    BadConstant {
        /// constant pool index
        index:    u16,
        /// the expected entry kind
        expected: &'static str,
    },
    /// A `Utf8` constant was not valid modified UTF-8.
    #[error("constant pool index {index} is not valid modified UTF-8")]
    BadUtf8 {
        /// constant pool index
        index: u16,
    },
    /// An annotation element value had an unknown tag.
    #[error("unknown annotation element tag {0:#04x}")]
    BadElementTag(u8),
    /// A method descriptor did not follow the descriptor grammar.
    #[error("malformed method descriptor `{descriptor}`: {message}")]
    BadDescriptor {
        /// the raw descriptor
        descriptor: String,
        /// parser message
        message:    String,
    },
}

/// Shorthand for class file reader results.
pub type ClassResult<T> = Result<T, ClassFormatError>;

#[derive(Debug, Clone)]
/// Constant pool entries the reader resolves; everything else is a
/// placeholder so indices stay aligned.
enum Constant {
    /// `CONSTANT_Utf8`
    Utf8(String),
    /// `CONSTANT_Class`, pointing at a Utf8 internal name.
    Class(u16),
    /// Any other entry, or the unusable slot after a Long/Double.
    Other,
}

#[derive(Debug)]
/// A parsed constant pool; index 0 is unused, as in the class file.
struct ConstantPool(Vec<Constant>);

impl ConstantPool {
    /// Resolves a `CONSTANT_Utf8` entry.
    fn utf8(&self, index: u16) -> ClassResult<&str> {
        match self.0.get(index as usize) {
            Some(Constant::Utf8(s)) => Ok(s),
            _ => Err(ClassFormatError::BadConstant {
                index,
                expected: "Utf8",
            }),
        }
    }

    /// Resolves a `CONSTANT_Class` entry to its internal name.
    fn class_name(&self, index: u16) -> ClassResult<&str> {
        match self.0.get(index as usize) {
            Some(Constant::Class(name_index)) => self.utf8(*name_index),
            _ => Err(ClassFormatError::BadConstant {
                index,
                expected: "Class",
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A method as declared in a class file.
pub struct MethodInfo {
    /// Raw `access_flags`.
    pub access_flags: u16,
    /// Method name.
    pub name:         String,
    /// Parsed descriptor.
    pub descriptor:   MethodDescriptor,
    /// Declared exceptions, dotted.
    pub exceptions:   Vec<String>,
    /// Annotation type names, dotted.
    pub annotations:  Vec<String>,
}

impl MethodInfo {
    /// Constructors, static initializers and compiler-generated methods are
    /// not part of a class's API.
    pub fn is_api_method(&self) -> bool {
        self.access_flags & ACC_SYNTHETIC == 0 && !self.name.starts_with('<')
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// The parts of a class file the verifier cares about.
pub struct ClassInfo {
    /// Major class file version.
    pub major_version: u16,
    /// Raw class `access_flags`.
    pub access_flags:  u16,
    /// Internal name from `this_class`, e.g. `a/b/Foo`.
    pub this_class:    String,
    /// Class annotation type names, dotted.
    pub annotations:   Vec<String>,
    /// Declared methods, in class file order.
    pub methods:       Vec<MethodInfo>,
}

impl ClassInfo {
    /// Reads a class file from bytes.
    pub fn parse(mut bytes: &[u8]) -> ClassResult<Self> {
        let buf = &mut bytes;

        let magic = read_u32(buf, "magic")?;
        if magic != MAGIC {
            return Err(ClassFormatError::BadMagic(magic));
        }
        let _minor = read_u16(buf, "minor version")?;
        let major_version = read_u16(buf, "major version")?;

        let pool = read_constant_pool(buf)?;

        let access_flags = read_u16(buf, "access flags")?;
        let this_class = pool.class_name(read_u16(buf, "this_class")?)?.to_string();
        let _super_class = read_u16(buf, "super_class")?;

        let interfaces = read_u16(buf, "interfaces count")?;
        skip(buf, interfaces as usize * 2, "interfaces")?;

        let fields = read_u16(buf, "fields count")?;
        for _ in 0..fields {
            skip(buf, 6, "field")?;
            skip_attributes(buf)?;
        }

        let method_count = read_u16(buf, "methods count")?;
        let mut methods = Vec::with_capacity(method_count as usize);
        for _ in 0..method_count {
            methods.push(read_method(buf, &pool)?);
        }

        let mut annotations = Vec::new();
        let attribute_count = read_u16(buf, "class attributes count")?;
        for _ in 0..attribute_count {
            let (name, mut body) = read_attribute(buf, &pool)?;
            if name == VISIBLE_ANNOTATIONS_ATTR || name == INVISIBLE_ANNOTATIONS_ATTR {
                annotations.extend(read_annotation_types(&mut body, &pool)?);
            }
        }

        Ok(Self {
            major_version,
            access_flags,
            this_class,
            annotations,
            methods,
        })
    }

    /// `this_class` in dotted form.
    pub fn dotted_name(&self) -> String {
        internal_to_dotted(&self.this_class)
    }
}

/// Fails with `Truncated` unless `n` more bytes are available.
fn need(buf: &&[u8], n: usize, what: &'static str) -> ClassResult<()> {
    if buf.remaining() < n {
        Err(ClassFormatError::Truncated(what))
    } else {
        Ok(())
    }
}

/// Reads one byte.
fn read_u8(buf: &mut &[u8], what: &'static str) -> ClassResult<u8> {
    need(buf, 1, what)?;
    Ok(buf.get_u8())
}

/// Reads a big-endian `u2`.
fn read_u16(buf: &mut &[u8], what: &'static str) -> ClassResult<u16> {
    need(buf, 2, what)?;
    Ok(buf.get_u16())
}

/// Reads a big-endian `u4`.
fn read_u32(buf: &mut &[u8], what: &'static str) -> ClassResult<u32> {
    need(buf, 4, what)?;
    Ok(buf.get_u32())
}

/// Advances past `n` bytes.
fn skip(buf: &mut &[u8], n: usize, what: &'static str) -> ClassResult<()> {
    need(buf, n, what)?;
    buf.advance(n);
    Ok(())
}

/// Decodes the body of a `Utf8` constant (JVMS §4.4.7).
///
/// NUL is `C0 80` and supplementary characters are surrogate pairs of 3-byte
/// sequences. Plain 4-byte UTF-8, stray continuation bytes and unpaired
/// surrogates are rejected.
fn decode_modified_utf8(bytes: &[u8]) -> Option<String> {
    let continuation = |i: usize| {
        bytes
            .get(i)
            .filter(|b| **b & 0xC0 == 0x80)
            .map(|b| u16::from(*b & 0x3F))
    };

    let mut units = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let lead = bytes[i];
        match lead {
            0x01..=0x7F => {
                units.push(u16::from(lead));
                i += 1;
            }
            0xC0..=0xDF => {
                units.push((u16::from(lead & 0x1F) << 6) | continuation(i + 1)?);
                i += 2;
            }
            0xE0..=0xEF => {
                units.push(
                    (u16::from(lead & 0x0F) << 12)
                        | (continuation(i + 1)? << 6)
                        | continuation(i + 2)?,
                );
                i += 3;
            }
            _ => return None,
        }
    }

    String::from_utf16(&units).ok()
}

/// Reads the constant pool, keeping Utf8 and Class entries.
fn read_constant_pool(buf: &mut &[u8]) -> ClassResult<ConstantPool> {
    let count = read_u16(buf, "constant pool count")?;
    let mut entries = Vec::with_capacity(count as usize);
    entries.push(Constant::Other);

    let mut index = 1u16;
    while index < count {
        let tag = read_u8(buf, "constant pool tag")?;
        let entry = match tag {
            1 => {
                let len = read_u16(buf, "Utf8 length")? as usize;
                need(buf, len, "Utf8 bytes")?;
                let text = decode_modified_utf8(&buf[..len])
                    .ok_or(ClassFormatError::BadUtf8 { index })?;
                buf.advance(len);
                Constant::Utf8(text)
            }
            7 => Constant::Class(read_u16(buf, "Class")?),
            // String, MethodType, Module, Package
            8 | 16 | 19 | 20 => {
                skip(buf, 2, "constant")?;
                Constant::Other
            }
            // MethodHandle
            15 => {
                skip(buf, 3, "MethodHandle")?;
                Constant::Other
            }
            // Integer, Float, refs, NameAndType, Dynamic, InvokeDynamic
            3 | 4 | 9 | 10 | 11 | 12 | 17 | 18 => {
                skip(buf, 4, "constant")?;
                Constant::Other
            }
            // Long, Double take two slots
            5 | 6 => {
                skip(buf, 8, "Long/Double")?;
                entries.push(Constant::Other);
                index += 1;
                Constant::Other
            }
            tag => return Err(ClassFormatError::UnknownTag { tag, index }),
        };
        entries.push(entry);
        index += 1;
    }

    Ok(ConstantPool(entries))
}

/// Reads an attribute header and returns its name and body.
fn read_attribute<'a, 'p>(
    buf: &mut &'a [u8],
    pool: &'p ConstantPool,
) -> ClassResult<(&'p str, &'a [u8])> {
    let name = pool.utf8(read_u16(buf, "attribute name")?)?;
    let len = read_u32(buf, "attribute length")? as usize;
    need(buf, len, "attribute body")?;
    let all: &'a [u8] = *buf;
    let (body, rest) = all.split_at(len);
    *buf = rest;
    Ok((name, body))
}

/// Skips an `attributes_count` + attributes block.
fn skip_attributes(buf: &mut &[u8]) -> ClassResult<()> {
    let count = read_u16(buf, "attributes count")?;
    for _ in 0..count {
        skip(buf, 2, "attribute name")?;
        let len = read_u32(buf, "attribute length")? as usize;
        skip(buf, len, "attribute body")?;
    }
    Ok(())
}

/// Reads one `method_info`.
fn read_method(buf: &mut &[u8], pool: &ConstantPool) -> ClassResult<MethodInfo> {
    let access_flags = read_u16(buf, "method access flags")?;
    let name = pool.utf8(read_u16(buf, "method name")?)?.to_string();
    let raw_descriptor = pool.utf8(read_u16(buf, "method descriptor")?)?;
    let descriptor = parser::method_descriptor(raw_descriptor).map_err(|e| {
        ClassFormatError::BadDescriptor {
            descriptor: raw_descriptor.to_string(),
            message:    e.to_string(),
        }
    })?;

    let mut exceptions = Vec::new();
    let mut annotations = Vec::new();
    let count = read_u16(buf, "method attributes count")?;
    for _ in 0..count {
        let (attr, mut body) = read_attribute(buf, pool)?;
        match attr {
            EXCEPTIONS_ATTR => {
                let n = read_u16(&mut body, "exception count")?;
                for _ in 0..n {
                    let class = pool.class_name(read_u16(&mut body, "exception")?)?;
                    exceptions.push(internal_to_dotted(class));
                }
            }
            VISIBLE_ANNOTATIONS_ATTR | INVISIBLE_ANNOTATIONS_ATTR => {
                annotations.extend(read_annotation_types(&mut body, pool)?);
            }
            _ => {}
        }
    }

    Ok(MethodInfo {
        access_flags,
        name,
        descriptor,
        exceptions,
        annotations,
    })
}

/// Reads a `Runtime*Annotations` body and returns the annotation type names.
fn read_annotation_types(buf: &mut &[u8], pool: &ConstantPool) -> ClassResult<Vec<String>> {
    let count = read_u16(buf, "annotation count")?;
    let mut types = Vec::with_capacity(count as usize);
    for _ in 0..count {
        types.push(read_annotation(buf, pool)?);
    }
    Ok(types)
}

/// Reads one `annotation` structure, returning its dotted type name.
fn read_annotation(buf: &mut &[u8], pool: &ConstantPool) -> ClassResult<String> {
    let type_name = descriptor_to_dotted(pool.utf8(read_u16(buf, "annotation type")?)?);
    let pairs = read_u16(buf, "annotation element count")?;
    for _ in 0..pairs {
        skip(buf, 2, "element name")?;
        skip_element_value(buf, pool)?;
    }
    Ok(type_name)
}

/// Skips an `element_value`, recursing into nested annotations and arrays.
fn skip_element_value(buf: &mut &[u8], pool: &ConstantPool) -> ClassResult<()> {
    match read_u8(buf, "element value tag")? {
        b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'S' | b'Z' | b's' | b'c' => {
            skip(buf, 2, "element value")
        }
        b'e' => skip(buf, 4, "enum element value"),
        b'@' => read_annotation(buf, pool).map(|_| ()),
        b'[' => {
            let n = read_u16(buf, "array element count")?;
            for _ in 0..n {
                skip_element_value(buf, pool)?;
            }
            Ok(())
        }
        tag => Err(ClassFormatError::BadElementTag(tag)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_magic() {
        let bytes = [0xDE, 0xAD, 0xBE, 0xEF, 0, 0, 0, 52];
        assert_eq!(
            ClassInfo::parse(&bytes).unwrap_err(),
            ClassFormatError::BadMagic(0xDEAD_BEEF)
        );
    }

    #[test]
    fn rejects_truncated_header() {
        let bytes = [0xCA, 0xFE, 0xBA, 0xBE, 0, 0];
        assert!(matches!(
            ClassInfo::parse(&bytes).unwrap_err(),
            ClassFormatError::Truncated(_)
        ));
    }

    #[test]
    fn rejects_unknown_constant_tag() {
        // magic, version 0.52, pool count 2, tag 99
        let bytes = [0xCA, 0xFE, 0xBA, 0xBE, 0, 0, 0, 52, 0, 2, 99];
        assert_eq!(
            ClassInfo::parse(&bytes).unwrap_err(),
            ClassFormatError::UnknownTag { tag: 99, index: 1 }
        );
    }

    #[test]
    fn decodes_modified_utf8() {
        assert_eq!(decode_modified_utf8(b"doWork").as_deref(), Some("doWork"));
        assert_eq!(decode_modified_utf8(&[b'a', 0xC0, 0x80, b'b']).as_deref(), Some("a\0b"));
        assert_eq!(decode_modified_utf8("caf\u{e9}".as_bytes()).as_deref(), Some("caf\u{e9}"));
        assert_eq!(
            decode_modified_utf8(&[0xED, 0xA0, 0xBD, 0xED, 0xB8, 0x80]).as_deref(),
            Some("\u{1F600}")
        );
    }

    #[test]
    fn rejects_invalid_modified_utf8() {
        // plain UTF-8 for U+1F600
        assert_eq!(decode_modified_utf8(&[0xF0, 0x9F, 0x98, 0x80]), None);
        // unpaired high surrogate
        assert_eq!(decode_modified_utf8(&[b'x', 0xED, 0xA0, 0xBD]), None);
        // raw NUL and truncated sequence
        assert_eq!(decode_modified_utf8(&[b'a', 0x00]), None);
        assert_eq!(decode_modified_utf8(&[0xC3]), None);
    }

    #[test]
    fn names_differing_in_encoded_characters_stay_distinct() {
        let nul = decode_modified_utf8(&[b'f', 0xC0, 0x80]).unwrap();
        let emoji = decode_modified_utf8(&[b'f', 0xED, 0xA0, 0xBD, 0xED, 0xB8, 0x80]).unwrap();
        assert_ne!(nul, emoji);
    }

    #[test]
    fn bad_utf8_constant_is_a_format_error() {
        // magic, version 0.52, pool count 2, Utf8 of length 1 holding 0xFF
        let bytes = [0xCA, 0xFE, 0xBA, 0xBE, 0, 0, 0, 52, 0, 2, 1, 0, 1, 0xFF];
        assert_eq!(
            ClassInfo::parse(&bytes).unwrap_err(),
            ClassFormatError::BadUtf8 { index: 1 }
        );
    }

    #[test]
    fn api_method_filter() {
        let method = |name: &str, flags: u16| MethodInfo {
            access_flags: flags,
            name:         name.to_string(),
            descriptor:   parser::method_descriptor("()V").unwrap(),
            exceptions:   vec![],
            annotations:  vec![],
        };
        assert!(method("run", 0x0001).is_api_method());
        assert!(!method("<init>", 0x0001).is_api_method());
        assert!(!method("<clinit>", 0x0008).is_api_method());
        assert!(!method("lambda$run$0", 0x1000 | 0x0008).is_api_method());
    }
}
