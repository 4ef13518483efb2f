//! Encode a live maze and player into documents and back

use tracing::{debug, warn};

use dc_core::content::{BOSS_SKILLS, Boss, Encounter, GearSet, SkillId};
use dc_core::dungeon::walker;
use dc_core::{
    BuildOptions, EQUIPPED_SKILLS, Exit, Maze, MazeError, NO_EXIT, Player, Room, RoomId,
    RoomRecord, SkillTree, build_maze,
};

use crate::document::{EnemyEntry, MapDocument, PlayerDocument, RoomEntry, RoomRef, SkillsEntry};
use crate::error::SaveError;

fn slots_to_ids<const N: usize>(slots: &[Option<SkillId>; N]) -> [i32; N] {
    slots.map(|slot| slot.map_or(NO_EXIT, |id| i32::from(id.0)))
}

fn ids_to_slots<const N: usize>(key: &str, ids: [i32; N]) -> Result<[Option<SkillId>; N], SaveError> {
    let mut slots = [None; N];
    for (slot, id) in slots.iter_mut().zip(ids) {
        *slot = match id {
            NO_EXIT => None,
            id => Some(SkillId(u8::try_from(id).map_err(|_| SaveError::Malformed {
                key: key.to_string(),
                reason: format!("skill id {id} out of range"),
            })?)),
        };
    }
    Ok(slots)
}

fn room_entry(maze: &Maze, room: &Room) -> RoomEntry {
    let exits = room.exits.map(|exit| match exit {
        Exit::None => NO_EXIT,
        Exit::Room(idx) => maze.room(idx).id.0 as i32,
    });

    let enemy = room
        .encounter
        .iter()
        .map(|encounter| match encounter {
            Encounter::Enemy(enemy) => EnemyEntry {
                enemy: enemy.clone(),
                drop: None,
                skills: None,
            },
            Encounter::Boss(boss) => EnemyEntry {
                enemy: boss.enemy.clone(),
                drop: Some(boss.drop.clone()),
                skills: Some(slots_to_ids(&boss.skills)),
            },
        })
        .collect();

    RoomEntry {
        is_entry: room.is_entry(),
        info: room.description.clone(),
        exits,
        has_boss: room.has_boss,
        loot: room.loot.iter().cloned().collect(),
        enemy,
        story: room.story.clone(),
    }
}

/// Encode every room reachable from the entry
///
/// Fails with [`SaveError::RoomCountMismatch`] when the walk does not reach
/// every room the maze holds; nothing is written in that case.
pub fn encode_maze(maze: &Maze) -> Result<MapDocument, SaveError> {
    let order = walker::enumerate(maze);
    if order.len() != maze.size() {
        warn!(
            maze = %maze.name(),
            expected = maze.size(),
            found = order.len(),
            "room count mismatch, save aborted"
        );
        return Err(SaveError::RoomCountMismatch {
            expected: maze.size(),
            found: order.len(),
        });
    }

    let rooms = order
        .into_iter()
        .map(|idx| {
            let room = maze.room(idx);
            (room.id.to_string(), room_entry(maze, room))
        })
        .collect();
    Ok(MapDocument { rooms })
}

fn at_most_one<T>(key: &str, field: &str, mut values: Vec<T>) -> Result<Option<T>, SaveError> {
    if values.len() > 1 {
        return Err(SaveError::Malformed {
            key: key.to_string(),
            reason: format!("{field} holds {} entries, at most 1 allowed", values.len()),
        });
    }
    Ok(values.pop())
}

fn check_gear(key: &str, field: &str, gear: &GearSet) -> Result<(), SaveError> {
    match gear.misplaced() {
        None => Ok(()),
        Some((slot, found)) => Err(SaveError::Malformed {
            key: key.to_string(),
            reason: format!(
                "{field}: '{}' is {} gear stored under {slot}",
                found.name, found.slot
            ),
        }),
    }
}

fn room_record(key: String, entry: RoomEntry) -> Result<RoomRecord, SaveError> {
    let id: u32 = key
        .parse()
        .map_err(|_| MazeError::InvalidRoomId { key: key.clone() })?;

    let loot = at_most_one(&key, "loot", entry.loot)?;
    let encounter = match at_most_one(&key, "enemy", entry.enemy)? {
        None => None,
        Some(EnemyEntry { enemy, drop, skills }) if entry.has_boss => {
            let drop = drop.ok_or(SaveError::MissingField {
                room: key.clone(),
                field: "drop",
            })?;
            let skills = skills.ok_or(SaveError::MissingField {
                room: key.clone(),
                field: "skills",
            })?;
            check_gear(&key, "drop", &drop)?;
            Some(Encounter::Boss(Boss {
                enemy,
                drop,
                skills: ids_to_slots::<BOSS_SKILLS>(&key, skills)?,
            }))
        }
        Some(EnemyEntry {
            enemy,
            drop: None,
            skills: None,
        }) => Some(Encounter::Enemy(enemy)),
        // Only a boss carries a drop or skills
        Some(_) => {
            return Err(SaveError::Malformed {
                key,
                reason: "drop or skills on an enemy in a room without a boss".to_string(),
            });
        }
    };

    Ok(RoomRecord {
        id,
        is_entry: entry.is_entry,
        description: entry.info,
        exits: entry.exits,
        has_boss: entry.has_boss,
        loot,
        encounter,
        story: entry.story,
    })
}

/// Turn document entries into builder records, in document order
pub fn document_records(doc: MapDocument) -> Result<Vec<RoomRecord>, SaveError> {
    doc.rooms
        .into_iter()
        .map(|(key, entry)| room_record(key, entry))
        .collect()
}

/// Rebuild a maze from a definition or saved map document
pub fn decode_maze(
    doc: MapDocument,
    name: impl Into<String>,
    options: BuildOptions,
) -> Result<Maze, SaveError> {
    let records = document_records(doc)?;
    let maze = build_maze(name, records, options)?;
    debug!(maze = %maze.name(), rooms = maze.size(), "maze decoded");
    Ok(maze)
}

/// Encode the player; `map` names the map document the room id refers to
pub fn encode_player(player: &Player, maze: &Maze, map: &str) -> PlayerDocument {
    PlayerDocument {
        name: player.name.clone(),
        xp: player.xp,
        lvl: player.lvl,
        hp: player.hp,
        max_hp: player.max_hp,
        dzenai: player.dzenai,
        inv_count: player.inventory.len(),
        room: RoomRef {
            id: maze.room(player.room).id.0,
            map: map.to_string(),
        },
        inventory: player.inventory.clone(),
        gear: player.gear.clone(),
        stats: player.stats,
        skills: SkillsEntry {
            status: player.skills.unlocked,
            points: player.skills.points,
            skills: player.skills.skills,
            equipped: slots_to_ids(&player.skills.equipped),
        },
    }
}

/// Rebuild the player and place them in the saved room of `maze`
pub fn decode_player(doc: PlayerDocument, maze: &Maze) -> Result<Player, SaveError> {
    let room = maze
        .find_room_by_id(RoomId(doc.room.id))
        .ok_or(MazeError::RoomNotFound { id: doc.room.id })?;

    if doc.inv_count != doc.inventory.len() {
        return Err(SaveError::Malformed {
            key: "invCount".to_string(),
            reason: format!(
                "{} declared, {} listed",
                doc.inv_count,
                doc.inventory.len()
            ),
        });
    }

    check_gear("gear", "gear", &doc.gear)?;
    let equipped = ids_to_slots::<EQUIPPED_SKILLS>("skills.equipped", doc.skills.equipped)?;

    Ok(Player {
        name: doc.name,
        xp: doc.xp,
        lvl: doc.lvl,
        hp: doc.hp,
        max_hp: doc.max_hp,
        dzenai: doc.dzenai,
        inventory: doc.inventory,
        gear: doc.gear,
        stats: doc.stats,
        skills: SkillTree {
            unlocked: doc.skills.status,
            points: doc.skills.points,
            skills: doc.skills.skills,
            equipped,
        },
        room,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dc_core::content::{Enemy, Gear, GearSet, GearSlot, InventorySlot, Item, Treasure};
    use dc_core::{Direction, Stat, StatPart};

    fn sample() -> Maze {
        let records = vec![
            RoomRecord::new(0, "gate").with_exit(Direction::East, 1),
            RoomRecord::new(1, "yard").with_exit(Direction::West, 0),
        ];
        build_maze("sample", records, BuildOptions::default()).unwrap()
    }

    fn boss_maze() -> Maze {
        let mut drop = GearSet::default();
        drop.equip(Gear::new("crown", GearSlot::Head, [1, 1, 1, 1, 1]));
        let records = vec![
            RoomRecord::new(0, "antechamber").with_exit(Direction::North, 1),
            RoomRecord::new(1, "throne room")
                .with_exit(Direction::South, 0)
                .with_encounter(Encounter::Boss(Boss {
                    enemy: Enemy::new("king", 8, 100),
                    drop,
                    skills: [Some(SkillId(2)), None, Some(SkillId(4)), None, None],
                })),
        ];
        build_maze("castle", records, BuildOptions::default()).unwrap()
    }

    #[test]
    fn test_encode_sample() {
        let doc = encode_maze(&sample()).unwrap();
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.rooms[0].0, "0");
        assert!(doc.rooms[0].1.is_entry);
        assert_eq!(doc.rooms[0].1.exits, [-1, 1, -1, -1]);
        assert_eq!(doc.rooms[1].1.exits, [-1, -1, -1, 0]);
        assert!(!doc.rooms[1].1.is_entry);
    }

    #[test]
    fn test_sample_round_trip() {
        let maze = sample();
        let back = decode_maze(encode_maze(&maze).unwrap(), "sample", BuildOptions::default())
            .unwrap();
        assert_eq!(back.size(), 2);
        let east = back.neighbor(back.entry(), Direction::East).unwrap();
        assert_eq!(back.room(east).id, RoomId(1));
        assert_eq!(back.neighbor(east, Direction::West), Some(back.entry()));
    }

    #[test]
    fn test_boss_encoding() {
        let doc = encode_maze(&boss_maze()).unwrap();
        let throne = doc.get("1").unwrap();
        assert!(throne.has_boss);
        let boss = &throne.enemy[0];
        assert_eq!(boss.skills, Some([2, -1, 4, -1, -1]));
        assert_eq!(boss.drop.as_ref().unwrap().head.as_ref().unwrap().name, "crown");

        let back = decode_maze(doc, "castle", BuildOptions::default()).unwrap();
        let idx = back.find_room_by_id(RoomId(1)).unwrap();
        match &back.room(idx).encounter {
            Some(Encounter::Boss(boss)) => {
                assert_eq!(boss.skills[0], Some(SkillId(2)));
                assert_eq!(boss.skills[1], None);
            }
            other => panic!("expected boss, got {other:?}"),
        }
    }

    #[test]
    fn test_boss_without_drop_is_missing_field() {
        let mut doc = encode_maze(&boss_maze()).unwrap();
        doc.rooms[1].1.enemy[0].drop = None;
        let err = decode_maze(doc, "castle", BuildOptions::default()).unwrap_err();
        assert!(matches!(err, SaveError::MissingField { field: "drop", .. }));
    }

    #[test]
    fn test_boss_fields_without_boss_flag_rejected() {
        let mut doc = encode_maze(&boss_maze()).unwrap();
        doc.rooms[1].1.has_boss = false;
        let err = decode_maze(doc, "castle", BuildOptions::default()).unwrap_err();
        assert!(matches!(err, SaveError::Malformed { key, .. } if key == "1"));
    }

    #[test]
    fn test_skills_alone_without_boss_flag_rejected() {
        let mut doc = encode_maze(&boss_maze()).unwrap();
        let enemy = &mut doc.rooms[1].1.enemy[0];
        enemy.drop = None;
        doc.rooms[1].1.has_boss = false;
        assert!(matches!(
            decode_maze(doc, "castle", BuildOptions::default()),
            Err(SaveError::Malformed { .. })
        ));
    }

    #[test]
    fn test_drop_in_wrong_slot_rejected() {
        let mut doc = encode_maze(&boss_maze()).unwrap();
        let drop = doc.rooms[1].1.enemy[0].drop.as_mut().unwrap();
        drop.weapon = drop.head.take();
        let err = decode_maze(doc, "castle", BuildOptions::default()).unwrap_err();
        assert!(matches!(err, SaveError::Malformed { reason, .. } if reason.contains("crown")));
    }

    #[test]
    fn test_player_gear_in_wrong_slot_rejected() {
        let maze = sample();
        let player = Player::new("Mara", maze.entry());
        let mut doc = encode_player(&player, &maze, "map.json");
        doc.gear.legs = Some(Gear::new("spear", GearSlot::Weapon, [3, 0, 0, 0, 0]));
        assert!(matches!(
            decode_player(doc, &maze),
            Err(SaveError::Malformed { key, .. }) if key == "gear"
        ));
    }

    #[test]
    fn test_orphan_room_aborts_encode() {
        let records = vec![RoomRecord::new(0, "a"), RoomRecord::new(1, "island")];
        let maze = build_maze("islands", records, BuildOptions::default()).unwrap();
        let err = encode_maze(&maze).unwrap_err();
        assert!(matches!(
            err,
            SaveError::RoomCountMismatch {
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_two_loot_entries_rejected() {
        let mut doc = encode_maze(&sample()).unwrap();
        let gem = Item::Treasure(Treasure {
            name: "gem".to_string(),
            value: 5,
        });
        doc.rooms[0].1.loot = vec![gem.clone(), gem];
        let err = decode_maze(doc, "sample", BuildOptions::default()).unwrap_err();
        assert!(matches!(err, SaveError::Malformed { .. }));
    }

    #[test]
    fn test_non_numeric_key_rejected() {
        let mut doc = encode_maze(&sample()).unwrap();
        doc.rooms[1].0 = "yard".to_string();
        let err = decode_maze(doc, "sample", BuildOptions::default()).unwrap_err();
        assert!(matches!(err, SaveError::Maze(MazeError::InvalidRoomId { .. })));
    }

    #[test]
    fn test_player_round_trip() {
        let maze = boss_maze();
        let throne = maze.find_room_by_id(RoomId(1)).unwrap();
        let mut player = Player::new("Mara", throne);
        player.xp = 340;
        player.dzenai = 77;
        player.inventory.push(InventorySlot {
            count: 2,
            item: Item::Treasure(Treasure {
                name: "pearl".to_string(),
                value: 30,
            }),
        });
        player.gear.equip(Gear::new("spear", GearSlot::Weapon, [3, 0, 0, 0, 0]));
        player.stats.set(Stat::Luck, StatPart::Bonus, 2);
        player.skills.unlocked = true;
        player.skills.points = 3;
        player.skills.skills[1].remaining = 2;
        player.skills.equipped = [Some(SkillId(1)), None, None, Some(SkillId(5))];

        let doc = encode_player(&player, &maze, "map.json");
        assert_eq!(doc.room.id, 1);
        assert_eq!(doc.inv_count, 1);
        assert_eq!(doc.skills.equipped, [1, -1, -1, 5]);

        let back = decode_player(doc, &maze).unwrap();
        assert_eq!(back, player);
    }

    #[test]
    fn test_player_in_unknown_room_fails() {
        let maze = sample();
        let player = Player::new("Mara", maze.entry());
        let mut doc = encode_player(&player, &maze, "map.json");
        doc.room.id = 9;
        let err = decode_player(doc, &maze).unwrap_err();
        assert!(matches!(err, SaveError::Maze(MazeError::RoomNotFound { id: 9 })));
    }

    #[test]
    fn test_inventory_count_mismatch() {
        let maze = sample();
        let player = Player::new("Mara", maze.entry());
        let mut doc = encode_player(&player, &maze, "map.json");
        doc.inv_count = 4;
        assert!(matches!(
            decode_player(doc, &maze),
            Err(SaveError::Malformed { .. })
        ));
    }
}
