//! Template directory loading.

use std::fs;
use std::path::Path;

use minijinja::Environment;
use tracing::info;

use crate::error::EngineError;

/// Load every file in `dir` into a template environment, keyed by file name.
pub(crate) fn load_dir(dir: &Path) -> Result<Environment<'static>, EngineError> {
    let mut env = Environment::new();
    let mut count = 0usize;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let source = fs::read_to_string(&path)?;
        env.add_template_owned(name.to_string(), source)?;
        count += 1;
    }
    info!(dir = %dir.display(), template_count = count, "Templates loaded");
    Ok(env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_dir_registers_each_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut f = fs::File::create(dir.path().join("hello.html")).unwrap();
        writeln!(f, "<h1>Hello {{{{ name }}}}!</h1>").unwrap();

        let env = load_dir(dir.path()).unwrap();
        let tmpl = env.get_template("hello.html").unwrap();
        let out = tmpl.render(minijinja::context! { name => "World" }).unwrap();
        assert_eq!(out.trim(), "<h1>Hello World!</h1>");
    }

    #[test]
    fn load_dir_missing_directory_is_io_error() {
        let err = load_dir(Path::new("/nonexistent/trellis-templates")).unwrap_err();
        assert!(matches!(err, EngineError::Io(_)));
    }
}
