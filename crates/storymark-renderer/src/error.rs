use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("layout failed: {}", .0.join("; "))]
    Compile(Vec<String>),

    #[error("export failed: {}", .0.join("; "))]
    Export(Vec<String>),

    #[error("failed to write {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
