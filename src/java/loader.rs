#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    fs,
    io::{BufReader, Cursor, Read, Seek},
    path::Path,
};

use walkdir::WalkDir;
use zip::ZipArchive;

use super::{
    classfile::{ACC_SYNTHETIC, ClassInfo, MethodInfo},
    surface::{CLASS_EXTENSION, CandidateSurface, ClassPath, ClassSurface, MemberSignature, Modifiers},
};
use crate::verify::VerifyError;

/// Class files that describe modules or packages rather than classes.
const METADATA_CLASSES: [&str; 2] = ["module-info", "package-info"];

/// Returns true for archive or directory entries that should become a
/// [`ClassSurface`].
fn is_class_entry(path: &str) -> bool {
    path.ends_with(CLASS_EXTENSION) && !path.starts_with("META-INF/")
}

/// Builds the surface of one parsed class, or `None` for classes that are not
/// part of an API.
fn class_surface(path: ClassPath, info: ClassInfo) -> Option<ClassSurface> {
    if METADATA_CLASSES.contains(&path.name()) || info.access_flags & ACC_SYNTHETIC != 0 {
        return None;
    }

    let methods = info
        .methods
        .into_iter()
        .filter(MethodInfo::is_api_method)
        .map(|m| MemberSignature {
            name:        m.name,
            params:      m.descriptor.params,
            return_type: m.descriptor.return_type,
            exceptions:  m.exceptions.into_iter().collect(),
            modifiers:   Modifiers::from_access_flags(m.access_flags),
            owner:       path.clone(),
            annotations: m.annotations,
            excluded:    false,
        })
        .collect();

    Some(ClassSurface {
        path,
        annotations: info.annotations,
        excluded: false,
        methods,
    })
}

/// Parses one class file's bytes into a surface.
///
/// * `origin`: entry name or file path, used in errors
/// * `relative`: path relative to the archive/directory root
fn parse_class(origin: &str, relative: &str, bytes: &[u8]) -> Result<Option<ClassSurface>, VerifyError> {
    let Some(path) = ClassPath::parse(relative) else {
        tracing::debug!("Ignoring {origin}: not a class name");
        return Ok(None);
    };

    let info = ClassInfo::parse(bytes).map_err(|source| VerifyError::ClassFormat {
        origin: origin.to_string(),
        source,
    })?;

    Ok(class_surface(path, info))
}

/// Reads every class in a jar archive, in archive order.
///
/// Nothing is filtered: exclusion markers are resolved later by
/// [`crate::verify::ExclusionFilter`].
pub fn load_reference<R: Read + Seek>(reader: R) -> Result<Vec<ClassSurface>, VerifyError> {
    let mut archive = ZipArchive::new(reader)?;
    let mut classes = Vec::new();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() || !is_class_entry(entry.name()) {
            continue;
        }

        let name = entry.name().to_string();
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut bytes)
            .map_err(VerifyError::ReadArtifact)?;

        if let Some(class) = parse_class(&name, &name, &bytes)? {
            tracing::trace!("reference class {}", class.path());
            classes.push(class);
        }
    }

    tracing::debug!("Loaded {} reference classes", classes.len());
    Ok(classes)
}

/// Reads an in-memory jar, as handed over by a byte-source collaborator.
pub fn load_reference_bytes(bytes: &[u8]) -> Result<Vec<ClassSurface>, VerifyError> {
    load_reference(Cursor::new(bytes))
}

/// Walks a directory of compiled classes.
///
/// Paths are taken relative to `root`, so `root/a/b/Foo.class` becomes
/// `a/b/Foo`. Empty directories contribute nothing.
pub fn load_candidate(root: &Path) -> Result<CandidateSurface, VerifyError> {
    Ok(CandidateSurface::new(load_class_dir(root)?))
}

/// Collects the classes under `root`, sorted by path.
fn load_class_dir(root: &Path) -> Result<Vec<ClassSurface>, VerifyError> {
    if !root.is_dir() {
        return Err(VerifyError::CandidateRoot(root.to_path_buf()));
    }

    let mut classes = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let relative = relative.to_string_lossy().replace('\\', "/");
        if !is_class_entry(&relative) {
            continue;
        }

        let bytes = fs::read(entry.path()).map_err(|source| VerifyError::Io {
            path: entry.path().to_path_buf(),
            source,
        })?;

        if let Some(class) = parse_class(&entry.path().display().to_string(), &relative, &bytes)? {
            tracing::trace!("candidate class {}", class.path());
            classes.push(class);
        }
    }

    tracing::debug!("Found {} candidate classes under {}", classes.len(), root.display());
    Ok(classes)
}

/// Loads every class from either a jar file or a class directory, for
/// inspection.
pub fn load_path(path: &Path) -> Result<Vec<ClassSurface>, VerifyError> {
    if path.is_dir() {
        return load_class_dir(path);
    }

    let file = fs::File::open(path).map_err(|source| VerifyError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_reference(BufReader::new(file))
}
