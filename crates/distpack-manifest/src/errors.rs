use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while locating or reading an installed package's metadata
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("Invalid package name: '{0}'")]
    InvalidName(String),

    #[error("Cannot find package '{package}' in installed modules (node_modules directories searched: {count})", count = .searched.len())]
    NotFound {
        package: String,
        searched: Vec<PathBuf>,
    },

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Package '{package}' has no resolvable entry point (tried {})", .candidate.display())]
    EntryNotFound { package: String, candidate: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = ResolutionError::NotFound {
            package: "left-pad".to_string(),
            searched: vec![PathBuf::from("/a/node_modules")],
        };
        assert_eq!(
            err.to_string(),
            "Cannot find package 'left-pad' in installed modules (node_modules directories searched: 1)"
        );
    }
}
