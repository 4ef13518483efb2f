//! Loading hand-authored maze definitions

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use dc_core::{BuildOptions, Maze};

use crate::codec::decode_maze;
use crate::document::MapDocument;
use crate::error::SaveError;

/// Build a maze from definition text
pub fn parse_definition(
    json: &str,
    name: impl Into<String>,
    options: BuildOptions,
) -> Result<Maze, SaveError> {
    let doc: MapDocument = serde_json::from_str(json)?;
    decode_maze(doc, name, options)
}

/// Build a maze from a definition file; the file stem names the maze
pub fn load_definition(path: impl AsRef<Path>, options: BuildOptions) -> Result<Maze, SaveError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|_| SaveError::NotFound(path.display().to_string()))?;
    let doc: MapDocument = serde_json::from_reader(BufReader::new(file))?;
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "maze".to_string());
    decode_maze(doc, name, options)
}
