//! Save slots on disk
//!
//! A slot is a directory holding three documents: the map, the player and a
//! manifest with the save header. A save is written to `<slot>.tmp/` and
//! swapped into place by renaming directories, so a reader sees either the
//! previous pair of documents or the new pair, never a mix. If a crash hits
//! between the two renames, the previous save is still in `<slot>.old/` and
//! loading falls back to it.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use dc_core::{BuildOptions, Maze, Player, World};

use crate::codec::{decode_maze, decode_player, encode_maze, encode_player};
use crate::document::{MapDocument, PlayerDocument};
use crate::error::SaveError;

/// Current save format version
pub const SAVE_VERSION: u32 = 1;

pub const MAP_FILE: &str = "map.json";
pub const PLAYER_FILE: &str = "player.json";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Environment variable overriding the save directory
pub const SAVE_DIR_ENV: &str = "DCRAWL_SAVE_DIR";

/// Save header stored in the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveHeader {
    /// Magic identifier
    pub magic: String,
    /// Save format version
    pub version: u32,
    pub player_name: String,
    /// Display name of the saved maze
    pub maze_name: String,
    /// Rooms in the map document
    pub rooms: usize,
    /// Seconds since the Unix epoch
    pub timestamp: u64,
}

fn unix_seconds() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

impl SaveHeader {
    const MAGIC: &'static str = "DCRS";

    /// Manifest for `world`, whose maze encoded to `map`
    pub fn new(world: &World, map: &MapDocument) -> Self {
        Self {
            magic: Self::MAGIC.to_string(),
            version: SAVE_VERSION,
            player_name: world.player.name.clone(),
            maze_name: world.maze.name().to_string(),
            rooms: map.len(),
            timestamp: unix_seconds(),
        }
    }

    /// Check the manifest itself before any document is read
    pub fn validate(&self) -> Result<(), SaveError> {
        if self.magic != Self::MAGIC {
            return Err(SaveError::InvalidHeader);
        }
        if self.version != SAVE_VERSION {
            return Err(SaveError::IncompatibleVersion {
                expected: SAVE_VERSION,
                found: self.version,
            });
        }
        Ok(())
    }

    /// Check that the documents beside the manifest are the pair it committed
    pub fn check_contents(&self, maze: &Maze, player: &Player) -> Result<(), SaveError> {
        if maze.size() != self.rooms {
            return Err(SaveError::Malformed {
                key: MAP_FILE.to_string(),
                reason: format!(
                    "{} rooms decoded, manifest records {}",
                    maze.size(),
                    self.rooms
                ),
            });
        }
        if player.name != self.player_name {
            return Err(SaveError::Malformed {
                key: PLAYER_FILE.to_string(),
                reason: format!(
                    "player '{}' does not match manifest '{}'",
                    player.name, self.player_name
                ),
            });
        }
        Ok(())
    }
}

/// Where and how saves are written
#[derive(Debug, Clone)]
pub struct SaveConfig {
    pub dir: PathBuf,
    /// Pretty-print documents
    pub pretty: bool,
    pub build: BuildOptions,
}

impl SaveConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            pretty: true,
            build: BuildOptions::default(),
        }
    }

    /// `DCRAWL_SAVE_DIR` if set, otherwise [`default_save_dir`]
    pub fn from_env() -> Self {
        match std::env::var_os(SAVE_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Self::new(dir),
            _ => Self::new(default_save_dir()),
        }
    }

    pub fn slot(&self, name: &str) -> SaveSlot {
        SaveSlot {
            config: self.clone(),
            name: name.to_string(),
        }
    }
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Default save directory under the platform data dir
pub fn default_save_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("dcrawl");
    path.push("saves");
    path
}

/// One named save
#[derive(Debug, Clone)]
pub struct SaveSlot {
    config: SaveConfig,
    name: String,
}

fn write_document<T: Serialize>(path: &Path, value: &T, pretty: bool) -> Result<(), SaveError> {
    let mut writer = BufWriter::new(File::create(path)?);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, value)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, SaveError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

fn read_header(dir: &Path) -> Result<SaveHeader, SaveError> {
    let header: SaveHeader = read_document(&dir.join(MANIFEST_FILE))?;
    header.validate()?;
    Ok(header)
}

fn remove_dir_if_present(path: &Path) -> Result<(), SaveError> {
    if path.exists() {
        fs::remove_dir_all(path)?;
    }
    Ok(())
}

impl SaveSlot {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> PathBuf {
        self.config.dir.join(&self.name)
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        self.config.dir.join(format!("{}.{}", self.name, suffix))
    }

    /// The directory holding a complete save, if any
    fn committed_dir(&self) -> Option<PathBuf> {
        let current = self.path();
        if current.join(MANIFEST_FILE).exists() {
            return Some(current);
        }
        let previous = self.sibling("old");
        if previous.join(MANIFEST_FILE).exists() {
            warn!(slot = %self.name, "save interrupted, using previous save");
            return Some(previous);
        }
        None
    }

    pub fn exists(&self) -> bool {
        self.committed_dir().is_some()
    }

    /// Write `world` into this slot
    ///
    /// Both documents are encoded before anything touches the disk; on any
    /// failure the previous save is left as it was and the error is a
    /// [`SaveError::Save`].
    pub fn save(&self, world: &World) -> Result<SaveHeader, SaveError> {
        self.write(world).map_err(|err| {
            warn!(slot = %self.name, %err, "save aborted");
            SaveError::Save {
                slot: self.name.clone(),
                source: Box::new(err),
            }
        })
    }

    fn write(&self, world: &World) -> Result<SaveHeader, SaveError> {
        let map = encode_maze(&world.maze)?;
        let player = encode_player(&world.player, &world.maze, MAP_FILE);
        let header = SaveHeader::new(world, &map);

        fs::create_dir_all(&self.config.dir)?;
        let staging = self.sibling("tmp");
        remove_dir_if_present(&staging)?;
        fs::create_dir(&staging)?;

        let pretty = self.config.pretty;
        write_document(&staging.join(MAP_FILE), &map, pretty)?;
        write_document(&staging.join(PLAYER_FILE), &player, pretty)?;
        write_document(&staging.join(MANIFEST_FILE), &header, pretty)?;

        let current = self.path();
        let previous = self.sibling("old");
        if current.join(MANIFEST_FILE).exists() {
            remove_dir_if_present(&previous)?;
            fs::rename(&current, &previous)?;
        } else {
            // Last save was interrupted; `previous` may hold the only complete copy
            remove_dir_if_present(&current)?;
        }
        fs::rename(&staging, &current)?;
        remove_dir_if_present(&previous)?;

        info!(slot = %self.name, rooms = header.rooms, "game saved");
        Ok(header)
    }

    fn load_failed(&self, err: SaveError) -> SaveError {
        SaveError::Load {
            slot: self.name.clone(),
            source: Box::new(err),
        }
    }

    pub fn load_header(&self) -> Result<SaveHeader, SaveError> {
        let dir = self
            .committed_dir()
            .ok_or_else(|| SaveError::NotFound(self.name.clone()))?;
        read_header(&dir).map_err(|err| self.load_failed(err))
    }

    /// Rebuild the saved maze and place the player back in it
    ///
    /// Any failure after the slot is found is a [`SaveError::Load`]: a
    /// half-read save never becomes a session.
    pub fn load(&self) -> Result<World, SaveError> {
        let dir = self
            .committed_dir()
            .ok_or_else(|| SaveError::NotFound(self.name.clone()))?;
        self.read(&dir).map_err(|err| self.load_failed(err))
    }

    fn read(&self, dir: &Path) -> Result<World, SaveError> {
        let header = read_header(dir)?;

        let map: MapDocument = read_document(&dir.join(MAP_FILE))?;
        let maze = decode_maze(map, header.maze_name.clone(), self.config.build)?;
        let player: PlayerDocument = read_document(&dir.join(PLAYER_FILE))?;
        let player = decode_player(player, &maze)?;
        header.check_contents(&maze, &player)?;

        debug!(slot = %self.name, rooms = maze.size(), "game loaded");
        Ok(World::new(maze, player))
    }

    pub fn delete(&self) -> Result<(), SaveError> {
        if !self.exists() {
            return Err(SaveError::NotFound(self.name.clone()));
        }
        remove_dir_if_present(&self.path())?;
        remove_dir_if_present(&self.sibling("old"))?;
        remove_dir_if_present(&self.sibling("tmp"))?;
        Ok(())
    }
}

/// All readable saves under `config.dir`, newest first
pub fn list_slots(config: &SaveConfig) -> Result<Vec<(String, SaveHeader)>, SaveError> {
    if !config.dir.exists() {
        return Ok(Vec::new());
    }

    let mut saves = Vec::new();
    for entry in fs::read_dir(&config.dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(".tmp") || name.ends_with(".old") {
            continue;
        }
        if let Ok(header) = config.slot(&name).load_header() {
            saves.push((name, header));
        }
    }

    saves.sort_by(|a, b| b.1.timestamp.cmp(&a.1.timestamp));
    Ok(saves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dc_core::{Direction, RoomRecord, Severity, build_maze};

    fn scratch(tag: &str) -> SaveConfig {
        let dir = std::env::temp_dir().join(format!("dc_save_{}_{}", tag, std::process::id()));
        fs::remove_dir_all(&dir).ok();
        SaveConfig::new(dir)
    }

    fn world() -> World {
        let records = vec![
            RoomRecord::new(0, "gate").with_exit(Direction::East, 1),
            RoomRecord::new(1, "yard").with_exit(Direction::West, 0),
        ];
        World::begin(
            build_maze("keep", records, BuildOptions::default()).unwrap(),
            "Odo",
        )
    }

    #[test]
    fn test_save_and_load() {
        let config = scratch("roundtrip");
        let slot = config.slot("one");
        assert!(!slot.exists());

        let header = slot.save(&world()).unwrap();
        assert_eq!(header.rooms, 2);
        assert!(slot.exists());
        assert!(slot.path().join(MAP_FILE).exists());
        assert!(slot.path().join(PLAYER_FILE).exists());

        let loaded = slot.load().unwrap();
        assert_eq!(loaded.maze.name(), "keep");
        assert_eq!(loaded.maze.size(), 2);
        assert_eq!(loaded.player.name, "Odo");
        assert!(loaded.current_room().is_entry());

        fs::remove_dir_all(&config.dir).ok();
    }

    #[test]
    fn test_overwrite_leaves_no_staging() {
        let config = scratch("overwrite");
        let slot = config.slot("one");
        slot.save(&world()).unwrap();

        let mut moved = world();
        moved.player.room = moved
            .maze
            .neighbor(moved.maze.entry(), Direction::East)
            .unwrap();
        slot.save(&moved).unwrap();

        assert!(!config.dir.join("one.tmp").exists());
        assert!(!config.dir.join("one.old").exists());
        let loaded = slot.load().unwrap();
        assert_eq!(loaded.current_room().description, "yard");

        fs::remove_dir_all(&config.dir).ok();
    }

    #[test]
    fn test_interrupted_swap_falls_back_to_previous() {
        let config = scratch("interrupted");
        let slot = config.slot("one");
        slot.save(&world()).unwrap();

        // Simulate a crash after the old save was moved aside
        fs::rename(slot.path(), config.dir.join("one.old")).unwrap();
        assert!(slot.exists());
        assert_eq!(slot.load().unwrap().player.name, "Odo");

        fs::remove_dir_all(&config.dir).ok();
    }

    #[test]
    fn test_save_after_interrupted_swap() {
        let config = scratch("resume");
        let slot = config.slot("one");
        slot.save(&world()).unwrap();
        fs::rename(slot.path(), config.dir.join("one.old")).unwrap();
        // Half-written slot directory without a manifest
        fs::create_dir(slot.path()).unwrap();
        fs::write(slot.path().join(MAP_FILE), "{").unwrap();

        let mut moved = world();
        moved.player.name = "Ida".to_string();
        slot.save(&moved).unwrap();

        assert!(!config.dir.join("one.old").exists());
        assert_eq!(slot.load().unwrap().player.name, "Ida");

        fs::remove_dir_all(&config.dir).ok();
    }

    #[test]
    fn test_failed_encode_keeps_previous_save() {
        let config = scratch("mismatch");
        let slot = config.slot("one");
        slot.save(&world()).unwrap();

        let records = vec![RoomRecord::new(0, "a"), RoomRecord::new(1, "island")];
        let broken = World::begin(
            build_maze("broken", records, BuildOptions::default()).unwrap(),
            "Odo",
        );
        let err = slot.save(&broken).unwrap_err();
        assert_eq!(err.severity(), Severity::Warning);
        assert!(matches!(err.root(), SaveError::RoomCountMismatch { .. }));
        assert_eq!(slot.load().unwrap().maze.name(), "keep");

        fs::remove_dir_all(&config.dir).ok();
    }

    #[test]
    fn test_unwritable_dir_is_a_warning() {
        let config = scratch("unwritable");
        // The save directory path is taken by a plain file
        fs::write(&config.dir, "not a directory").unwrap();

        let err = config.slot("one").save(&world()).unwrap_err();
        assert_eq!(err.severity(), Severity::Warning);
        assert!(matches!(err, SaveError::Save { .. }));
        assert!(matches!(err.root(), SaveError::Io(_)));

        fs::remove_file(&config.dir).ok();
    }

    #[test]
    fn test_missing_player_document_is_fatal() {
        let config = scratch("halfload");
        let slot = config.slot("one");
        slot.save(&world()).unwrap();
        fs::remove_file(slot.path().join(PLAYER_FILE)).unwrap();

        let err = slot.load().unwrap_err();
        assert_eq!(err.severity(), Severity::Fatal);
        assert!(matches!(err, SaveError::Load { .. }));
        assert!(matches!(err.root(), SaveError::Io(_)));

        fs::remove_dir_all(&config.dir).ok();
    }

    #[test]
    fn test_manifest_must_match_documents() {
        let config = scratch("manifest");
        let slot = config.slot("one");
        slot.save(&world()).unwrap();

        let manifest = slot.path().join(MANIFEST_FILE);
        let mut header: SaveHeader = read_document(&manifest).unwrap();
        header.rooms = 5;
        write_document(&manifest, &header, false).unwrap();

        let err = slot.load().unwrap_err();
        assert_eq!(err.severity(), Severity::Fatal);
        assert!(matches!(err.root(), SaveError::Malformed { key, .. } if key == MAP_FILE));

        fs::remove_dir_all(&config.dir).ok();
    }

    #[test]
    fn test_header_validation() {
        let world = world();
        let map = encode_maze(&world.maze).unwrap();
        let header = SaveHeader::new(&world, &map);
        assert_eq!(header.rooms, 2);
        assert!(header.validate().is_ok());
        assert!(header.check_contents(&world.maze, &world.player).is_ok());

        let mut bad_header = header.clone();
        bad_header.magic = "XXXX".to_string();
        assert!(matches!(
            bad_header.validate(),
            Err(SaveError::InvalidHeader)
        ));

        let mut old_header = header;
        old_header.version = 999;
        assert!(matches!(
            old_header.validate(),
            Err(SaveError::IncompatibleVersion { .. })
        ));
    }

    #[test]
    fn test_list_and_delete() {
        let config = scratch("list");
        config.slot("a").save(&world()).unwrap();
        config.slot("b").save(&world()).unwrap();

        let names: Vec<String> = list_slots(&config)
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"a".to_string()));

        config.slot("a").delete().unwrap();
        assert_eq!(list_slots(&config).unwrap().len(), 1);
        assert!(matches!(
            config.slot("a").delete(),
            Err(SaveError::NotFound(_))
        ));

        fs::remove_dir_all(&config.dir).ok();
    }

    #[test]
    fn test_load_nonexistent() {
        let config = scratch("missing");
        assert!(matches!(
            config.slot("ghost").load(),
            Err(SaveError::NotFound(_))
        ));
    }
}
