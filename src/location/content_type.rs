//! Uniform type identifiers derived from file extensions.
//!
//! A small static table, not a registry: folders map to `public.folder` (or
//! `com.apple.package` for bundles), files map by lower-cased extension, and anything
//! unrecognised is `public.data`. Conformance walks the parent chain.

use std::path::Path;

use super::state::PathState;

pub const ITEM: &str = "public.item";
pub const DATA: &str = "public.data";
pub const FOLDER: &str = "public.folder";
pub const PACKAGE: &str = "com.apple.package";

/// Directory extensions that are presented as a single opaque item.
const PACKAGE_EXTENSIONS: &[&str] = &[
    "app",
    "appex",
    "bundle",
    "framework",
    "kext",
    "plugin",
    "pkg",
    "mpkg",
    "xcodeproj",
    "xcworkspace",
    "playground",
    "photoslibrary",
    "rtfd",
    "pages",
    "numbers",
    "key",
    "logicx",
];

/// (extension, identifier)
const BY_EXTENSION: &[(&str, &str)] = &[
    ("txt", "public.plain-text"),
    ("text", "public.plain-text"),
    ("md", "net.daringfireball.markdown"),
    ("markdown", "net.daringfireball.markdown"),
    ("csv", "public.comma-separated-values-text"),
    ("html", "public.html"),
    ("htm", "public.html"),
    ("xml", "public.xml"),
    ("json", "public.json"),
    ("rtf", "public.rtf"),
    ("rs", "public.rust-source"),
    ("c", "public.c-source"),
    ("h", "public.c-header"),
    ("swift", "public.swift-source"),
    ("py", "public.python-script"),
    ("sh", "public.shell-script"),
    ("jpg", "public.jpeg"),
    ("jpeg", "public.jpeg"),
    ("png", "public.png"),
    ("gif", "com.compuserve.gif"),
    ("tif", "public.tiff"),
    ("tiff", "public.tiff"),
    ("heic", "public.heic"),
    ("pdf", "com.adobe.pdf"),
    ("mp3", "public.mp3"),
    ("m4a", "com.apple.m4a-audio"),
    ("wav", "com.microsoft.waveform-audio"),
    ("mp4", "public.mpeg-4"),
    ("mov", "com.apple.quicktime-movie"),
    ("zip", "public.zip-archive"),
    ("gz", "org.gnu.gnu-zip-archive"),
    ("tar", "public.tar-archive"),
];

/// (identifier, parent)
const PARENTS: &[(&str, &str)] = &[
    ("public.plain-text", "public.text"),
    ("net.daringfireball.markdown", "public.plain-text"),
    ("public.comma-separated-values-text", "public.plain-text"),
    ("public.html", "public.text"),
    ("public.xml", "public.text"),
    ("public.json", "public.text"),
    ("public.rtf", "public.text"),
    ("public.rust-source", "public.source-code"),
    ("public.c-source", "public.source-code"),
    ("public.c-header", "public.source-code"),
    ("public.swift-source", "public.source-code"),
    ("public.python-script", "public.script"),
    ("public.shell-script", "public.script"),
    ("public.script", "public.source-code"),
    ("public.source-code", "public.plain-text"),
    ("public.text", DATA),
    ("public.jpeg", "public.image"),
    ("public.png", "public.image"),
    ("com.compuserve.gif", "public.image"),
    ("public.tiff", "public.image"),
    ("public.heic", "public.image"),
    ("public.image", DATA),
    ("com.adobe.pdf", DATA),
    ("public.mp3", "public.audio"),
    ("com.apple.m4a-audio", "public.audio"),
    ("com.microsoft.waveform-audio", "public.audio"),
    ("public.audio", "public.audiovisual-content"),
    ("public.mpeg-4", "public.movie"),
    ("com.apple.quicktime-movie", "public.movie"),
    ("public.movie", "public.audiovisual-content"),
    ("public.audiovisual-content", DATA),
    ("public.zip-archive", "public.archive"),
    ("org.gnu.gnu-zip-archive", "public.archive"),
    ("public.tar-archive", "public.archive"),
    ("public.archive", DATA),
    (PACKAGE, FOLDER),
    (FOLDER, "public.directory"),
    ("public.directory", ITEM),
    (DATA, ITEM),
];

fn lower_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// True if a directory at `path` should be treated as an opaque package.
pub fn is_package(path: &Path) -> bool {
    lower_extension(path)
        .map(|e| PACKAGE_EXTENSIONS.contains(&e.as_str()))
        .unwrap_or(false)
}

/// Identifier for whatever lives at `path` right now, `None` if nothing does.
pub fn type_identifier(path: &Path) -> Option<String> {
    match PathState::of(path) {
        PathState::Unknown => None,
        PathState::Folder if is_package(path) => Some(PACKAGE.to_string()),
        PathState::Folder => Some(FOLDER.to_string()),
        PathState::File => Some(identifier_for_extension(path).to_string()),
    }
}

fn identifier_for_extension(path: &Path) -> &'static str {
    lower_extension(path)
        .and_then(|ext| {
            BY_EXTENSION
                .iter()
                .find(|(e, _)| *e == ext)
                .map(|(_, id)| *id)
        })
        .unwrap_or(DATA)
}

fn parent_of(identifier: &str) -> Option<&'static str> {
    PARENTS
        .iter()
        .find(|(id, _)| *id == identifier)
        .map(|(_, parent)| *parent)
}

/// True if `identifier` is `ancestor` or descends from it.
pub fn identifier_conforms_to(identifier: &str, ancestor: &str) -> bool {
    if identifier == ancestor {
        return true;
    }
    let mut current = parent_of(identifier);
    while let Some(id) = current {
        if id == ancestor {
            return true;
        }
        current = parent_of(id);
    }
    false
}

/// True if the entry at `path` conforms to `identifier`. Nothing at `path` never conforms.
pub fn conforms_to(path: &Path, identifier: &str) -> bool {
    type_identifier(path)
        .map(|id| identifier_conforms_to(&id, identifier))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_is_text_and_item() {
        assert!(identifier_conforms_to("net.daringfireball.markdown", "public.text"));
        assert!(identifier_conforms_to("net.daringfireball.markdown", ITEM));
        assert!(!identifier_conforms_to("net.daringfireball.markdown", "public.image"));
    }

    #[test]
    fn package_is_folder_but_not_data() {
        assert!(identifier_conforms_to(PACKAGE, FOLDER));
        assert!(!identifier_conforms_to(PACKAGE, DATA));
    }

    #[test]
    fn package_detection_is_case_insensitive() {
        assert!(is_package(Path::new("/Applications/Safari.APP")));
        assert!(!is_package(Path::new("/tmp/plain")));
    }
}
