//! Shared fixtures for battle tests: a small metadata set and ready-made
//! battle states.

use crate::battle::state::{BattleKind, BattleSide, BattleState};
use crate::creature::{CreatureInst, SkillInstance};
use crate::metadata::{MetadataProvider, MetadataStore};
use schema::{
    BaseStats, ElementType, GrowthCurve, ItemData, ItemEffect, ItemId, Nature, SkillCategory,
    SkillData, SkillEffect, SkillId, SkillTarget, SpeciesData, SpeciesId, StatType, StatusKind,
    TypeChart, TypeMatchup, VolatileKind,
};
use std::collections::BTreeMap;

pub const RIVERSNAP: SpeciesId = SpeciesId(1);
pub const SPARKIT: SpeciesId = SpeciesId(2);
pub const MOLTENOX: SpeciesId = SpeciesId(3);

pub const TACKLE: SkillId = SkillId(1);
pub const QUICK_JAB: SkillId = SkillId(2);
pub const SPARK: SkillId = SkillId(3);
pub const DROWSE: SkillId = SkillId(4);
pub const HOWL: SkillId = SkillId(5);
pub const SEED_SNARE: SkillId = SkillId(6);
pub const EMBER: SkillId = SkillId(7);

pub const TONIC: ItemId = ItemId(1);
pub const FULL_RESTORE: ItemId = ItemId(2);
pub const CAPTURE_ORB: ItemId = ItemId(100);
pub const GREAT_ORB: ItemId = ItemId(101);

fn species(
    id: SpeciesId,
    name: &str,
    types: Vec<ElementType>,
    speed: u8,
    catch_rate: u8,
    learnset: BTreeMap<u8, Vec<SkillId>>,
) -> SpeciesData {
    SpeciesData {
        id,
        name: name.to_string(),
        types,
        base_stats: BaseStats {
            hp: 45,
            attack: 60,
            defense: 50,
            sp_attack: 50,
            sp_defense: 45,
            speed,
        },
        growth_curve: GrowthCurve::MediumFast,
        catch_rate,
        base_exp_yield: 60,
        ev_yield: [0, 1, 0, 0, 0, 0],
        learnset,
        evolutions: Vec::new(),
    }
}

fn damaging_skill(
    id: SkillId,
    name: &str,
    element: ElementType,
    category: SkillCategory,
    power: u16,
    priority: i8,
    effects: Vec<SkillEffect>,
) -> SkillData {
    SkillData {
        id,
        name: name.to_string(),
        element,
        category,
        power: Some(power),
        accuracy: Some(100),
        pp: 30,
        priority,
        crit_stage: 0,
        target: SkillTarget::Opponent,
        effects,
    }
}

pub fn test_metadata() -> MetadataStore {
    let mut store = MetadataStore::new();

    let mut riversnap_learnset = BTreeMap::new();
    riversnap_learnset.insert(1, vec![TACKLE]);
    riversnap_learnset.insert(10, vec![QUICK_JAB]);
    riversnap_learnset.insert(11, vec![SPARK]);
    store.insert_species(species(
        RIVERSNAP,
        "Riversnap",
        vec![ElementType::Water],
        90,
        45,
        riversnap_learnset,
    ));

    let mut sparkit_learnset = BTreeMap::new();
    sparkit_learnset.insert(1, vec![TACKLE]);
    store.insert_species(species(
        SPARKIT,
        "Sparkit",
        vec![ElementType::Electric],
        40,
        190,
        sparkit_learnset,
    ));

    let mut moltenox_learnset = BTreeMap::new();
    moltenox_learnset.insert(1, vec![TACKLE]);
    store.insert_species(species(
        MOLTENOX,
        "Moltenox",
        vec![ElementType::Fire],
        60,
        45,
        moltenox_learnset,
    ));

    store.insert_skill(damaging_skill(
        TACKLE,
        "Tackle",
        ElementType::Normal,
        SkillCategory::Physical,
        40,
        0,
        Vec::new(),
    ));
    store.insert_skill(damaging_skill(
        QUICK_JAB,
        "Quick Jab",
        ElementType::Normal,
        SkillCategory::Physical,
        40,
        1,
        Vec::new(),
    ));
    store.insert_skill(damaging_skill(
        SPARK,
        "Spark",
        ElementType::Electric,
        SkillCategory::Special,
        60,
        0,
        vec![SkillEffect::InflictStatus {
            status: StatusKind::Paralysis,
            chance: 10,
        }],
    ));
    store.insert_skill(SkillData {
        id: DROWSE,
        name: "Drowse".to_string(),
        element: ElementType::Psychic,
        category: SkillCategory::Status,
        power: None,
        accuracy: Some(100),
        pp: 15,
        priority: 0,
        crit_stage: 0,
        target: SkillTarget::Opponent,
        effects: vec![SkillEffect::InflictStatus {
            status: StatusKind::Sleep,
            chance: 100,
        }],
    });
    store.insert_skill(SkillData {
        id: HOWL,
        name: "Howl".to_string(),
        element: ElementType::Normal,
        category: SkillCategory::Status,
        power: None,
        accuracy: None,
        pp: 40,
        priority: 0,
        crit_stage: 0,
        target: SkillTarget::User,
        effects: vec![SkillEffect::ChangeStatStage {
            target: SkillTarget::User,
            stat: StatType::Attack,
            delta: 1,
            chance: 100,
        }],
    });
    store.insert_skill(SkillData {
        id: SEED_SNARE,
        name: "Seed Snare".to_string(),
        element: ElementType::Grass,
        category: SkillCategory::Status,
        power: None,
        accuracy: Some(90),
        pp: 10,
        priority: 0,
        crit_stage: 0,
        target: SkillTarget::Opponent,
        effects: vec![SkillEffect::InflictVolatile {
            volatile: VolatileKind::LeechSeed,
            chance: 100,
            turns: None,
        }],
    });
    store.insert_skill(damaging_skill(
        EMBER,
        "Ember",
        ElementType::Fire,
        SkillCategory::Special,
        40,
        0,
        vec![SkillEffect::InflictStatus {
            status: StatusKind::Burn,
            chance: 10,
        }],
    ));

    store.insert_item(ItemData {
        id: TONIC,
        name: "Tonic".to_string(),
        effect: ItemEffect::HealHp { amount: 20 },
    });
    store.insert_item(ItemData {
        id: FULL_RESTORE,
        name: "Full Restore".to_string(),
        effect: ItemEffect::CureStatus { status: None },
    });
    store.insert_item(ItemData {
        id: CAPTURE_ORB,
        name: "Capture Orb".to_string(),
        effect: ItemEffect::Ball { modifier: 1.0 },
    });
    store.insert_item(ItemData {
        id: GREAT_ORB,
        name: "Great Orb".to_string(),
        effect: ItemEffect::Ball { modifier: 1.5 },
    });

    store.set_type_chart(TypeChart::new(vec![
        TypeMatchup {
            attacking: ElementType::Electric,
            defending: ElementType::Water,
            multiplier: 3.0,
        },
        TypeMatchup {
            attacking: ElementType::Electric,
            defending: ElementType::Ground,
            multiplier: 0.0,
        },
        TypeMatchup {
            attacking: ElementType::Water,
            defending: ElementType::Fire,
            multiplier: 3.0,
        },
        TypeMatchup {
            attacking: ElementType::Fire,
            defending: ElementType::Water,
            multiplier: 0.5,
        },
    ]));

    store
}

/// A combatant with an explicit skill list (PP from metadata).
pub fn creature_with_skills(
    meta: &MetadataStore,
    species: SpeciesId,
    id: u32,
    level: u8,
    skills: &[SkillId],
) -> CreatureInst {
    let data = meta.species(species).unwrap();
    let mut creature = CreatureInst::new(id, data, level, [10; 6], Nature::Hardy, meta).unwrap();
    creature.skills = [None; 4];
    for (slot, &skill) in skills.iter().take(4).enumerate() {
        let pp = meta.skill(skill).unwrap().pp;
        creature.skills[slot] = Some(SkillInstance::new(skill, pp));
    }
    creature
}

/// Wild encounter: the player's Riversnap against a wild Sparkit. The bag
/// holds capture orbs and a tonic.
pub fn wild_battle_state(meta: &MetadataStore) -> BattleState {
    let mut player_creature =
        creature_with_skills(meta, RIVERSNAP, 1, 10, &[TACKLE, DROWSE, QUICK_JAB, HOWL]);
    player_creature.owner = Some("p1".to_string());
    let mut player =
        BattleSide::new(Some("p1".to_string()), "Red").with_roster(vec![player_creature]);
    player.bag.insert(CAPTURE_ORB, 5);
    player.bag.insert(GREAT_ORB, 2);
    player.bag.insert(TONIC, 2);

    let wild = creature_with_skills(meta, SPARKIT, 100, 5, &[TACKLE]);
    let opponent = BattleSide::new(None, "Wild").with_roster(vec![wild]);

    BattleState::new("test-wild", BattleKind::Wild, player, opponent)
}

/// Trainer battle: same player side against a rival with two Sparkit.
pub fn trainer_battle_state(meta: &MetadataStore) -> BattleState {
    let mut player_creature =
        creature_with_skills(meta, RIVERSNAP, 1, 10, &[TACKLE, DROWSE, QUICK_JAB, HOWL]);
    player_creature.owner = Some("p1".to_string());
    let mut player =
        BattleSide::new(Some("p1".to_string()), "Red").with_roster(vec![player_creature]);
    player.bag.insert(CAPTURE_ORB, 5);

    let mut first = creature_with_skills(meta, SPARKIT, 200, 5, &[TACKLE]);
    first.owner = Some("npc".to_string());
    let mut second = creature_with_skills(meta, SPARKIT, 201, 5, &[TACKLE]);
    second.owner = Some("npc".to_string());
    let opponent =
        BattleSide::new(Some("npc".to_string()), "Rival").with_roster(vec![first, second]);

    BattleState::new("test-trainer", BattleKind::Trainer, player, opponent)
}
