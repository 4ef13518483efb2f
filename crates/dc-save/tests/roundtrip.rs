use std::collections::{BTreeMap, BTreeSet, VecDeque};

use dc_core::content::{Boss, Consumable, Encounter, Enemy, Gear, GearSet, GearSlot, Item, SkillId};
use dc_core::{BuildOptions, Maze, NO_EXIT, RoomRecord, build_maze};
use dc_save::{MapDocument, decode_maze, encode_maze};
use proptest::prelude::*;

fn arb_contents() -> impl Strategy<Value = (Option<Item>, Option<Encounter>)> {
    let loot = prop_oneof![
        Just(None),
        (1i32..50).prop_map(|heal| Some(Item::Consumable(Consumable {
            name: "potion".to_string(),
            heal,
        }))),
        Just(Some(Item::Gear(Gear::new("buckler", GearSlot::Hands, [0, 1, 0, 0, 0])))),
    ];
    let encounter = prop_oneof![
        Just(None),
        (1u32..10).prop_map(|lvl| Some(Encounter::Enemy(Enemy::new("wolf", lvl, 10)))),
        (1u8..20).prop_map(|skill| {
            let mut drop = GearSet::default();
            drop.equip(Gear::new("warhammer", GearSlot::Weapon, [4, 0, 0, 0, 0]));
            Some(Encounter::Boss(Boss {
                enemy: Enemy::new("troll", 7, 80),
                drop,
                skills: [Some(SkillId(skill)), None, None, None, Some(SkillId(0))],
            }))
        }),
    ];
    (loot, encounter)
}

/// Records of a connected graph: everything not reachable from room 0 is dropped
fn arb_connected() -> impl Strategy<Value = Vec<RoomRecord>> {
    (1usize..30).prop_flat_map(|n| {
        prop::collection::vec(
            (
                prop::array::uniform4(prop::option::weighted(0.6, 0..n as u32)),
                arb_contents(),
            ),
            n,
        )
        .prop_map(|rooms| {
            let records: Vec<RoomRecord> = rooms
                .into_iter()
                .enumerate()
                .map(|(id, (exits, (loot, encounter)))| {
                    let mut record = RoomRecord::new(id as u32, format!("room {id}"));
                    for (slot, target) in exits.into_iter().enumerate() {
                        record.exits[slot] = target.map_or(NO_EXIT, |t| t as i32);
                    }
                    record.loot = loot;
                    if let Some(encounter) = encounter {
                        record = record.with_encounter(encounter);
                    }
                    if id % 3 == 0 {
                        record = record.with_story(format!("story/{id}.txt"));
                    }
                    record
                })
                .collect();

            let mut seen = BTreeSet::new();
            let mut queue = VecDeque::from([0u32]);
            while let Some(id) = queue.pop_front() {
                if seen.insert(id) {
                    for &t in &records[id as usize].exits {
                        if t != NO_EXIT {
                            queue.push_back(t as u32);
                        }
                    }
                }
            }
            records
                .into_iter()
                .filter(|r| seen.contains(&r.id))
                .collect()
        })
    })
}

/// Per-room view keyed by id, with exits as target ids
fn snapshot(maze: &Maze) -> BTreeMap<u32, (String, [i32; 4], bool, Option<Encounter>, Option<Item>, Option<String>)> {
    maze.rooms()
        .map(|room| {
            let exits = room
                .exits
                .map(|exit| exit.target().map_or(NO_EXIT, |idx| maze.room(idx).id.0 as i32));
            (
                room.id.0,
                (
                    room.description.clone(),
                    exits,
                    room.has_boss,
                    room.encounter.clone(),
                    room.loot.clone(),
                    room.story.clone(),
                ),
            )
        })
        .collect()
}

proptest! {
    #[test]
    fn encode_decode_is_isomorphic(records in arb_connected()) {
        let maze = build_maze("prop", records, BuildOptions::default()).unwrap();

        let doc = encode_maze(&maze).unwrap();
        prop_assert_eq!(doc.len(), maze.size());

        // Through text, as it would be on disk
        let text = serde_json::to_string(&doc).unwrap();
        let parsed: MapDocument = serde_json::from_str(&text).unwrap();
        let back = decode_maze(parsed, "prop", BuildOptions::default()).unwrap();

        prop_assert_eq!(back.size(), maze.size());
        prop_assert_eq!(back.entry_room().id, maze.entry_room().id);
        prop_assert_eq!(snapshot(&back), snapshot(&maze));
    }
}

#[test]
fn sample_scenario_round_trips() {
    let text = r#"{
        "0": {"isEntry": 1, "info": "west", "exits": [-1, 1, -1, -1], "hasBoss": 0},
        "1": {"isEntry": 0, "info": "east", "exits": [-1, -1, -1, 0], "hasBoss": 0}
    }"#;
    let doc: MapDocument = serde_json::from_str(text).unwrap();
    let maze = decode_maze(doc, "sample", BuildOptions::default()).unwrap();
    let encoded = serde_json::to_value(encode_maze(&maze).unwrap()).unwrap();
    let original: serde_json::Value = serde_json::from_str(text).unwrap();

    // Same rooms, same exits; encoding adds the empty loot/enemy arrays
    for key in ["0", "1"] {
        assert_eq!(encoded[key]["exits"], original[key]["exits"]);
        assert_eq!(encoded[key]["isEntry"], original[key]["isEntry"]);
        assert_eq!(encoded[key]["info"], original[key]["info"]);
    }
}
