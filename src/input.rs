use std::path::{Path, PathBuf};

/// Raw text of the two inputs of a run.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub object: String,
    pub report: String,
}

#[derive(thiserror::Error, Debug)]
pub enum InputError {
    #[error("cannot open {}: {source}", path.display())]
    MissingInputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn read(path: &Path) -> Result<String, InputError> {
    std::fs::read_to_string(path).map_err(|source| InputError::MissingInputFile { path: path.to_path_buf(), source })
}

/// Read both inputs up front so a missing file aborts before any decoding.
pub fn read_inputs(object: &Path, report: &Path) -> Result<Inputs, InputError> {
    Ok(Inputs { object: read(object)?, report: read(report)? })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_names_the_path() {
        let dir = std::env::temp_dir().join(format!("sicxe-rs-input-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let obj = dir.join("present.obj");
        std::fs::write(&obj, "HP000000000000\nE\n").unwrap();
        let result = read_inputs(&obj, &dir.join("no_such_file.sym"));
        let _ = std::fs::remove_dir_all(&dir);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("no_such_file.sym"));
    }
}
