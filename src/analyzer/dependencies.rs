use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

const MINIFIED_SIZE_RATIO: f64 = 0.4;
const BYTES_PER_KB: f64 = 1024.0;

// `import <anything> from '<path>'`, lazy so `import a from "x"; import b from "y"` yields both
static IMPORT_FROM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"import\s+.*?\s+from\s+['"]([^'"]+)['"]"#).expect("static import pattern")
});

/// Collect the external packages a component source imports.
///
/// Relative (`./`, `../`) and absolute (`/`) paths are internal and skipped.
/// Scoped packages keep their scope (`@scope/pkg/sub` becomes `@scope/pkg`),
/// everything else is cut at the first `/`.
pub fn extract_dependencies(source: &str) -> BTreeSet<String> {
    IMPORT_FROM
        .captures_iter(source)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|path| !path.starts_with('.') && !path.starts_with('/'))
        .map(package_name)
        .collect()
}

fn package_name(import_path: &str) -> String {
    let segments: Vec<&str> = import_path.split('/').collect();
    if import_path.starts_with('@') {
        segments.iter().take(2).copied().collect::<Vec<_>>().join("/")
    } else {
        segments[0].to_string()
    }
}

pub fn count_lines(source: &str) -> usize {
    source.split('\n').count()
}

/// Rough minified size, reported as `"<n>KB"`.
pub fn estimate_bundle_size(total_bytes: usize) -> String {
    let kb = (total_bytes as f64 * MINIFIED_SIZE_RATIO / BYTES_PER_KB).round() as u64;
    format!("{}KB", kb)
}
