//! Client import path rewriting.

use std::path::{Component, Path, MAIN_SEPARATOR};

use path_clean::PathClean;

/// Local client paths (`./client`, `/abs/client`) are rewritten relative to
/// the declaration file. Anything else is a package specifier and is kept.
pub fn is_local_import(client_dir: &str) -> bool {
    client_dir.starts_with('.') || client_dir.starts_with(MAIN_SEPARATOR)
}

/// The client import specifier to use in `output_file`.
pub fn client_import_path(client_dir: &str, output_file: &Path, cwd: &Path) -> String {
    if is_local_import(client_dir) {
        import_path_relative_to_output(Path::new(client_dir), output_file, cwd)
    } else {
        client_dir.to_string()
    }
}

/// Path of `import_path` as seen from the directory of `output_file`, in
/// module specifier form: always starting with `.`, forward slashes only,
/// without a `.ts`/`.js` extension or a trailing `/index`. Relative inputs
/// are resolved against `cwd`.
pub fn import_path_relative_to_output(import_path: &Path, output_file: &Path, cwd: &Path) -> String {
    let output_dir = output_file.parent().unwrap_or_else(|| Path::new(""));
    let from = cwd.join(output_dir).clean();
    let to = cwd.join(import_path).clean();

    let mut relative = relative_path(&from, &to);
    if !relative.starts_with('.') {
        relative = format!("./{}", relative);
    }

    for extension in [".ts", ".js"] {
        if let Some(stripped) = relative.strip_suffix(extension) {
            relative = stripped.to_string();
            break;
        }
    }

    if let Some(stripped) = relative.strip_suffix("/index") {
        relative = stripped.to_string();
    }

    relative.replace('\\', "/")
}

fn relative_path(from: &Path, to: &Path) -> String {
    let from: Vec<Component> = from.components().collect();
    let to: Vec<Component> = to.components().collect();

    let common = from
        .iter()
        .zip(&to)
        .take_while(|(a, b)| a == b)
        .count();

    let parents = std::iter::repeat("..".to_string()).take(from.len() - common);
    let rest = to[common..]
        .iter()
        .map(|c| c.as_os_str().to_string_lossy().into_owned());

    parents.chain(rest).collect::<Vec<_>>().join("/")
}
