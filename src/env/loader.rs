use std::{
    fs, io,
    io::Cursor,
    path::{Path, PathBuf},
};

use tracing::warn;

use super::error::{EnvError, EnvResult};
use super::options::LoadMode;

/// Entries read from one env file, in file order.
#[derive(Debug, Clone, Default)]
pub struct ParsedEnvFile {
    pub path: PathBuf,
    pub entries: Vec<(String, String)>,
    pub malformed: usize,
}

/// Resolves `<dir>/<file_name>` and checks that it is a readable file.
pub fn locate_env_file(dir: &Path, file_name: &str) -> EnvResult<PathBuf> {
    let path = dir.join(file_name);
    match fs::metadata(&path) {
        Ok(meta) if meta.is_file() => Ok(path),
        Ok(_) => Err(EnvError::PathResolution {
            path,
            source: io::Error::other("not a regular file"),
        }),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            Err(EnvError::FileNotFound { path })
        }
        Err(source) => Err(EnvError::PathResolution { path, source }),
    }
}

pub fn read_env_file(path: &Path, mode: LoadMode) -> EnvResult<ParsedEnvFile> {
    let bytes = fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => EnvError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => EnvError::PathResolution {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let content = match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(err) => {
            let valid = &err.as_bytes()[..err.utf8_error().valid_up_to()];
            let line = valid.iter().filter(|&&b| b == b'\n').count() + 1;
            if mode == LoadMode::Strict {
                return Err(EnvError::Parse {
                    path: path.to_path_buf(),
                    line,
                });
            }
            warn!(
                path = %path.display(),
                line,
                "env file is not valid UTF-8, decoding lossily"
            );
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    };

    parse_env_content(path, &content, mode)
}

pub fn parse_env_content(
    path: &Path,
    content: &str,
    mode: LoadMode,
) -> EnvResult<ParsedEnvFile> {
    let mut parsed = ParsedEnvFile {
        path: path.to_path_buf(),
        ..ParsedEnvFile::default()
    };

    let mut cursor = 0;
    for item in dotenvy::from_read_iter(Cursor::new(content)) {
        match item {
            Ok(pair) => parsed.entries.push(pair),
            Err(err) => {
                // the offending line stays out of errors and logs
                let line = match &err {
                    dotenvy::Error::LineParse(text, _) => line_of(content, text, &mut cursor),
                    _ => line_at(content, cursor),
                };
                if mode == LoadMode::Strict {
                    return Err(EnvError::Parse {
                        path: path.to_path_buf(),
                        line,
                    });
                }
                parsed.malformed += 1;
                warn!(path = %path.display(), line, "skipping malformed env line");
            }
        }
    }

    Ok(parsed)
}

/// 1-based line where `fragment` starts, searching from `cursor` on.
///
/// dotenvy hands back the rejected logical line verbatim, so it is always a
/// slice of `content`. Errors arrive in file order; `cursor` moves past each
/// match so a repeated bad line resolves to its next occurrence.
fn line_of(content: &str, fragment: &str, cursor: &mut usize) -> usize {
    match content[*cursor..].find(fragment) {
        Some(offset) => {
            let start = *cursor + offset;
            *cursor = start + fragment.len();
            line_at(content, start)
        }
        None => line_at(content, *cursor),
    }
}

fn line_at(content: &str, offset: usize) -> usize {
    content[..offset].matches('\n').count() + 1
}
