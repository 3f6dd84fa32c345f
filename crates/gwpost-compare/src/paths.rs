//! Relative links between generated pages.

use std::path::{Component, Path, PathBuf};

fn normalize(path: &Path) -> Vec<Component<'_>> {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            _ => components.push(component),
        }
    }
    components
}

/// Path leading from directory `from` to `to`, computed lexically.
///
/// Both paths should be absolute, or relative to the same directory.
///
/// ```
/// use std::path::{Path, PathBuf};
/// use gwpost_compare::paths::relative_path;
///
/// assert_eq!(
///     relative_path(Path::new("/home/me/report/1"), Path::new("/home/me/pe/cal/posplots.html")),
///     PathBuf::from("../../pe/cal/posplots.html"),
/// );
/// assert_eq!(relative_path(Path::new("/a/b"), Path::new("/a/b")), PathBuf::from("."));
/// ```
#[must_use]
pub fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from = normalize(from);
    let to = normalize(to);
    let common = from
        .iter()
        .zip(&to)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..from.len() {
        relative.push("..");
    }
    for component in &to[common..] {
        relative.push(component.as_os_str());
    }
    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    relative
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descend_and_climb() {
        assert_eq!(
            relative_path(Path::new("/out/1"), Path::new("/out/1/SkyPlots/a.svg")),
            PathBuf::from("SkyPlots/a.svg")
        );
        assert_eq!(
            relative_path(Path::new("/out/1"), Path::new("/elsewhere")),
            PathBuf::from("../../elsewhere")
        );
    }

    #[test]
    fn test_dot_components() {
        assert_eq!(
            relative_path(Path::new("/out/./1/"), Path::new("/out/x/../2/p.html")),
            PathBuf::from("../2/p.html")
        );
        assert_eq!(
            relative_path(Path::new("out"), Path::new("pages/100")),
            PathBuf::from("../pages/100")
        );
    }
}
