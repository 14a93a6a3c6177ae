use distpack_config::BundlerPathError;
use distpack_manifest::ResolutionError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a build
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("No package configured to build")]
    MissingPackage,

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("{0}")]
    BundlerNotFound(#[from] BundlerPathError),

    #[error("Failed to start bundler {}: {source}", .program.display())]
    BundlerSpawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Compilation failed ({bundler} exited with {status}):\n{diagnostics}", status = exit_status(.code))]
    Compilation {
        bundler: String,
        code: Option<i32>,
        diagnostics: String,
    },

    #[error("Bundler {0} produced no output files")]
    EmptyOutput(String),

    #[error("Refusing to clean output directory {}: it contains the project", .0.display())]
    UnsafeOutputDir(PathBuf),

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize asset: {0}")]
    Serialize(#[from] serde_json::Error),
}

fn exit_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {}", code),
        None => "signal".to_string(),
    }
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compilation_error_display() {
        let err = BuildError::Compilation {
            bundler: "esbuild".to_string(),
            code: Some(1),
            diagnostics: "✘ [ERROR] Could not resolve \"fs\"".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Compilation failed (esbuild exited with code 1):\n✘ [ERROR] Could not resolve \"fs\""
        );
    }

    #[test]
    fn test_resolution_error_is_transparent() {
        let err = BuildError::from(ResolutionError::InvalidName("Bad".to_string()));
        assert_eq!(err.to_string(), "Invalid package name: 'Bad'");
    }
}
