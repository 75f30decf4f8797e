//! Header path classification

/// Path fragments that mark a header as toolchain or standard-library owned
const SYSTEM_HEADER_MARKERS: &[&str] = &[
    "/usr/include/",
    "/usr/local/include/",
    "/usr/lib/gcc/",
    "/usr/lib/clang/",
    "/usr/lib/llvm",
    "/include/c++/",
    "/Library/Developer/CommandLineTools/",
    "/Applications/Xcode",
    "/Xcode.app/",
    "/MacOSX.sdk/",
    "Microsoft Visual Studio",
    "Windows Kits",
    "\\VC\\Tools\\MSVC\\",
    "/opt/homebrew/",
];

/// Returns true for headers owned by the toolchain or the standard library
///
/// Extensionless bare names such as `vector` or `<memory>` are treated as
/// standard-library headers.
pub fn is_system_header(path: &str) -> bool {
    if path.starts_with('<') && path.ends_with('>') {
        return true;
    }

    let normalized = path.replace('\\', "/");
    if SYSTEM_HEADER_MARKERS
        .iter()
        .any(|marker| path.contains(marker) || normalized.contains(marker))
    {
        return true;
    }

    !path.contains('/') && !path.contains('\\') && !path.contains('.')
}
