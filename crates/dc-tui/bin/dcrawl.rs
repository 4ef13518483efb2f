//! Dungeon crawler command-line front end
//!
//! Builds mazes from definition files, draws them, and manages save slots.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;

use dc_core::dungeon::walker;
use dc_core::{BuildOptions, Maze, MazeError, RoomId, RoomIdx, Severity, World};
use dc_save::slot::SAVE_DIR_ENV;
use dc_save::{SaveConfig, SaveError, SaveHeader, list_slots, load_definition};
use dc_tui::{Theme, show_map};

/// Dungeon crawler maze tool
#[derive(Parser, Debug)]
#[command(name = "dcrawl")]
#[command(author, version, about = "Build, draw and save dungeon mazes", long_about = None)]
struct Args {
    /// Verbose logging (repeat for more)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Save directory
    #[arg(long = "save-dir", env = SAVE_DIR_ENV, global = true)]
    save_dir: Option<PathBuf>,

    /// Reject duplicate room ids instead of keeping the first
    #[arg(long = "strict", global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a maze definition and report on it
    Check {
        /// Maze definition file
        definition: PathBuf,
    },

    /// Draw a maze from a definition or a save slot
    Map {
        /// Maze definition file
        #[arg(required_unless_present = "slot", conflicts_with = "slot")]
        definition: Option<PathBuf>,

        /// Save slot to draw instead
        #[arg(long = "slot")]
        slot: Option<String>,

        /// Room id to centre on
        #[arg(long = "at")]
        at: Option<u32>,

        /// Print plain text instead of the full-screen view
        #[arg(long = "plain")]
        plain: bool,
    },

    /// Start a fresh session from a definition and save it
    Save {
        /// Maze definition file
        definition: PathBuf,

        #[arg(long = "slot")]
        slot: String,

        /// Player name
        #[arg(short = 'u', long = "player")]
        player: String,
    },

    /// Load a save slot and report on it
    Load {
        #[arg(long = "slot")]
        slot: String,
    },

    /// List save slots
    Slots,

    /// Delete a save slot
    Delete {
        #[arg(long = "slot")]
        slot: String,
    },
}

impl Args {
    fn build_options(&self) -> BuildOptions {
        if self.strict {
            BuildOptions::strict()
        } else {
            BuildOptions::default()
        }
    }

    fn save_config(&self) -> SaveConfig {
        let mut config = match &self.save_dir {
            Some(dir) => SaveConfig::new(dir),
            None => SaveConfig::from_env(),
        };
        config.build = self.build_options();
        config
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.severity() {
            Severity::Fatal => {
                error!(%err, "command failed");
                eprintln!("dcrawl: {err}");
                ExitCode::FAILURE
            }
            Severity::Warning => {
                warn!(%err, "command finished with a warning");
                eprintln!("dcrawl: warning: {err}");
                ExitCode::SUCCESS
            }
        },
    }
}

/// `RUST_LOG` wins; otherwise each `-v` raises the level from `warn`
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<(), SaveError> {
    match &args.command {
        Command::Check { definition } => {
            let maze = load_definition(definition, args.build_options())?;
            report_maze(&maze);
            Ok(())
        }
        Command::Map {
            definition,
            slot,
            at,
            plain,
        } => {
            let world = match (definition, slot) {
                (_, Some(slot)) => args.save_config().slot(slot).load()?,
                (Some(definition), None) => {
                    World::begin(load_definition(definition, args.build_options())?, "")
                }
                (None, None) => return Err(SaveError::NotFound("maze definition".to_string())),
            };
            let current = match at {
                Some(id) => locate(&world.maze, *id)?,
                None => world.player.room,
            };
            let grid = dc_core::render_map(&world.maze, current);
            if *plain {
                print!("{grid}");
            } else {
                show_map(&grid, world.maze.name(), Theme::detect())?;
            }
            Ok(())
        }
        Command::Save {
            definition,
            slot,
            player,
        } => {
            let maze = load_definition(definition, args.build_options())?;
            let world = World::begin(maze, player.as_str());
            let header = args.save_config().slot(slot).save(&world)?;
            println!("saved slot '{slot}'");
            report_header(&header);
            Ok(())
        }
        Command::Load { slot } => {
            let slot = args.save_config().slot(slot);
            let header = slot.load_header()?;
            let world = slot.load()?;
            report_header(&header);
            println!(
                "{} is in room {} of {}",
                world.player.name,
                world.current_room().id,
                world.maze.name()
            );
            Ok(())
        }
        Command::Slots => {
            let slots = list_slots(&args.save_config())?;
            if slots.is_empty() {
                println!("no saves");
            }
            for (name, header) in slots {
                println!(
                    "{name}: {} in {} ({} rooms)",
                    header.player_name, header.maze_name, header.rooms
                );
            }
            Ok(())
        }
        Command::Delete { slot } => {
            args.save_config().slot(slot).delete()?;
            println!("deleted slot '{slot}'");
            Ok(())
        }
    }
}

fn locate(maze: &Maze, id: u32) -> Result<RoomIdx, SaveError> {
    maze.find_room_by_id(RoomId(id))
        .ok_or(SaveError::Maze(MazeError::RoomNotFound { id }))
}

fn report_maze(maze: &Maze) {
    let reachable = walker::walk(maze, |_, _| {});
    let bosses = maze.rooms().filter(|room| room.has_boss).count();
    let loot = maze.rooms().filter(|room| room.loot.is_some()).count();

    println!("maze: {}", maze.name());
    println!("rooms: {} ({reachable} reachable from the entry)", maze.size());
    println!("entry: room {}", maze.entry_room().id);
    println!("bosses: {bosses}, loot: {loot}");

    if reachable < maze.size() {
        warn!(
            unreachable = maze.size() - reachable,
            "maze has rooms the entry cannot reach; it will not save"
        );
    }
    debug!(maze = %maze.name(), "check complete");
}

fn report_header(header: &SaveHeader) {
    println!(
        "{} in {} ({} rooms, format v{}, saved at {})",
        header.player_name, header.maze_name, header.rooms, header.version, header.timestamp
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_map_requires_definition_or_slot() {
        assert!(Args::try_parse_from(["dcrawl", "map"]).is_err());
        assert!(Args::try_parse_from(["dcrawl", "map", "crypt.json"]).is_ok());
        assert!(Args::try_parse_from(["dcrawl", "map", "--slot", "one", "--plain"]).is_ok());
        assert!(Args::try_parse_from(["dcrawl", "map", "crypt.json", "--slot", "one"]).is_err());
    }

    #[test]
    fn test_verbosity_counts() {
        let args = Args::try_parse_from(["dcrawl", "-vv", "slots"]).unwrap();
        assert_eq!(args.verbose, 2);
        assert!(matches!(args.command, Command::Slots));
    }

    #[test]
    fn test_strict_selects_reject_policy() {
        let args = Args::try_parse_from(["dcrawl", "--strict", "check", "m.json"]).unwrap();
        assert_eq!(
            args.build_options().duplicates,
            dc_core::DuplicatePolicy::Reject
        );
    }
}
