use crate::error::JoinError;

/// Checks that an input path exists before any processing starts.
///
/// Pipes and character devices (`/dev/stdin`, process substitution) pass; other
/// open failures are left to [`open_input`].
///
/// # Errors
/// * `JoinError::InputNotFound` if `path` does not exist.
/// * `JoinError::InputIsDirectory` if `path` is a directory.
pub fn check_path<P: AsRef<std::path::Path>>(path: P) -> Result<(), JoinError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(JoinError::InputNotFound {
            path: path.to_path_buf(),
        });
    }
    if path.is_dir() {
        return Err(JoinError::InputIsDirectory {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Creates the parent directory of `path` if it is missing.
pub fn ensure_parent_dir_exist<P: AsRef<std::path::Path>>(path: P) -> Result<(), JoinError> {
    let path = path.as_ref();
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            std::fs::create_dir_all(parent).map_err(|source| JoinError::Create {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

/// Opens an input file. The csv reader on top of it does its own buffering.
pub fn open_input<P: AsRef<std::path::Path>>(path: P) -> Result<std::fs::File, JoinError> {
    let path = path.as_ref();
    std::fs::File::open(path).map_err(|source| JoinError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Creates or truncates the output file, creating its directory first.
pub fn create_output<P: AsRef<std::path::Path>>(path: P) -> Result<std::fs::File, JoinError> {
    let path = path.as_ref();
    ensure_parent_dir_exist(path)?;
    std::fs::File::create(path).map_err(|source| JoinError::Create {
        path: path.to_path_buf(),
        source,
    })
}
