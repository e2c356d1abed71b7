// These nodes do not define items, only which items can kill which enemies
// under what circumstances, assuming that you've arrived in the room
// containing the enemy.
//
// Anything that can be destroyed in more than one way is also included here:
// bushes, flowers, mushrooms, etc.
//
// Mystery seeds can technically kill many enemies that ember, scent or gale
// seeds can kill. They are only listed as a kill option where all three of
// those seed types work.
//
// If an enemy shares a room with a throwable object and is vulnerable to
// thrown objects, adding "bracelet" as an OR is sufficient.
//
// Animal companions are not part of this logic, since they are only available
// in certain areas.
//
// When testing how to kill an enemy, try:
// - sword
// - beams
// - boomerang L-1
// - boomerang L-2
// - rod
// - seeds (satchel first, slingshot if satchel doesn't work)
// - bombs
// - thrown objects (if applicable)
// - magnet ball (if applicable)
// - fool's ore
// - punch
// - whatever pushes it into pits (if applicable): sword, beams, shield,
//   boomerangs (they work on hardhats), seeds, rod, bombs, shovel, thrown
//   objects, fool's ore, punch. Not magnet ball; it kills anything pittable.

use oosrando_logic::{Requirement, and, hard, hard_and, hard_or, or};

pub fn kill_nodes() -> Vec<(&'static str, Requirement)> {
    vec![
        ("gale seed weapon", and!("gale seeds", or!("slingshot", hard_and!("satchel", "jump")))),
        // stun, then drop from satchel
        ("gale boomerang", and!("gale satchel", "boomerang")),
        ("slingshot kill normal", and!("slingshot", "seed kill normal")),
        ("jump kill normal", and!("jump", "kill normal")),
        ("jump pit normal", and!("jump", "pit kill normal")),
        // required enemies in rough route order, prerequisites first
        (
            "seed kill normal",
            or!("ember seeds", "scent seeds", "gale seed weapon", "gale boomerang", "mystery seeds"),
        ),
        (
            "pop maku bubble",
            or!("sword", "rod", "seed kill normal", "pegasus slingshot", "bombs", "fool's ore"),
        ),
        // The "safe" version is for areas where you can't get stuck on the
        // wrong side of a bush.
        (
            "remove bush safe",
            or!("sword", "boomerang L-2", "bracelet", "ember seeds", "gale slingshot", "bombs"),
        ),
        (
            "remove bush",
            or!(
                "sword",
                "boomerang L-2",
                "bracelet",
                hard_or!("ember seeds", "gale slingshot", "bombs")
            ),
        ),
        (
            "kill normal",
            or!("sword", "bombs", "beams", "seed kill normal", "fool's ore", "punch"),
        ),
        (
            "pit kill normal",
            or!(
                "sword",
                "beams",
                "shield",
                "scent seeds",
                "rod",
                "bombs",
                hard("shovel"),
                "fool's ore",
                "punch"
            ),
        ),
        ("kill stalfos", or!("kill normal", "rod")),
        ("kill stalfos (throw)", or!("kill stalfos", "bracelet")),
        (
            "hit lever",
            or!(
                "sword",
                "boomerang",
                "rod",
                "ember seeds",
                "scent seeds",
                "any slingshot",
                "fool's ore",
                "punch",
                "shovel"
            ),
        ),
        ("kill goriya bros", or!("sword", "bombs", "fool's ore", "punch")),
        ("kill goriya", or!("kill normal")),
        ("kill goriya (pit)", or!("kill goriya", "pit kill normal")),
        (
            "kill aquamentus",
            or!("sword", "beams", "scent seeds", "bombs", "fool's ore", "punch"),
        ),
        ("hit far switch", or!("beams", "boomerang", "bombs", "any slingshot")),
        ("toss bombs", and!("bombs", "toss ring")),
        ("kill rope", or!("kill normal")),
        (
            "kill hardhat (pit, throw)",
            or!(
                "gale seed weapon",
                "sword",
                "beams",
                "boomerang",
                "shield",
                "scent seeds",
                "rod",
                "bombs",
                hard("shovel"),
                "fool's ore",
                "bracelet"
            ),
        ),
        (
            "kill moblin (gap, throw)",
            or!(
                "sword",
                "beams",
                "scent seeds",
                "slingshot kill normal",
                "bombs",
                "fool's ore",
                "punch",
                "jump kill normal",
                "jump pit normal"
            ),
        ),
        ("kill zol", or!("kill normal")),
        ("remove pot", or!("sword L-2", "bracelet")),
        ("kill facade", or!("bombs")),
        ("flip spiked beetle", or!("shield", "shovel")),
        (
            "damage spiked beetle (throw)",
            or!("sword", "bombs", "beams", "seed kill normal", "bracelet", "fool's ore"),
        ),
        (
            "flip kill spiked beetle (throw)",
            and!("flip spiked beetle", "damage spiked beetle (throw)"),
        ),
        ("gale kill spiked beetle", and!("gale seed weapon")),
        (
            "kill spiked beetle (throw)",
            or!("flip kill spiked beetle (throw)", "gale kill spiked beetle"),
        ),
        ("kill mimic", or!("kill normal")),
        ("damage omuai", or!("sword", "bombs", "scent seeds", "fool's ore", "punch")),
        ("kill omuai", and!("damage omuai", "bracelet")),
        ("damage mothula", or!("sword", "bombs", "scent seeds", "fool's ore", "punch")),
        // you will basically die without feather
        ("kill mothula", and!("damage mothula", "jump")),
        (
            "remove flower",
            or!(
                "sword",
                "boomerang L-2",
                hard_or!("ember seeds", "gale slingshot", "bombs")
            ),
        ),
        ("damage agunima", or!("sword", "scent seeds", "bombs", "fool's ore", "punch")),
        ("kill agunima", and!("ember seeds", "damage agunima")),
        ("hit very far lever", or!("boomerang L-2", "any slingshot")),
        ("hit lever gap", or!("sword", "boomerang", "rod", "any slingshot", "fool's ore")),
        ("jump hit lever", and!("jump", "hit lever gap")),
        ("long jump hit lever", and!("long jump", "hit lever")),
        (
            "hit far lever",
            or!("jump hit lever", "long jump hit lever", "boomerang", "any slingshot"),
        ),
        (
            "kill gohma",
            and!(or!("scent seeds", "ember seeds"), or!("slingshot", hard("start"))),
        ),
        ("remove mushroom", or!("boomerang L-2", "bracelet")),
        ("kill moldorm", or!("sword", "bombs", "punch", "scent seeds", "fool's ore")),
        ("kill iron mask", or!("kill normal")),
        (
            "kill armos",
            or!("sword", "bombs", "beams", "boomerang L-2", "scent seeds", "fool's ore"),
        ),
        ("kill gibdo", or!("kill normal", "boomerang L-2", "rod")),
        (
            "kill darknut",
            or!("sword", "bombs", "beams", "scent seeds", "fool's ore", "punch"),
        ),
        (
            "kill darknut (pit)",
            or!(
                "sword",
                "bombs",
                "beams",
                "scent seeds",
                "fool's ore",
                "punch",
                "shield",
                "rod",
                hard("shovel")
            ),
        ),
        ("kill syger", or!("sword", "bombs", "scent seeds", "fool's ore", "punch")),
        ("break crystal", or!("sword", "bombs", "punch", "bracelet")),
        ("kill hardhat (magnet)", or!("magnet gloves", "gale seed weapon")),
        ("kill vire", or!("sword", "bombs", "fool's ore", "punch")),
        ("finish manhandla", or!("sword", "bombs", "any slingshot", "fool's ore")),
        ("kill manhandla", and!("boomerang L-2", "finish manhandla")),
        ("kill wizzrobe", or!("kill normal")),
        // even bombs don't work!
        ("kill magunesu", or!("sword", "fool's ore", "punch")),
        (
            "kill poe sister",
            or!("sword", "beams", "ember seeds", "scent seeds", "bombs", "fool's ore", "punch"),
        ),
        (
            "kill darknut (across pit)",
            or!(
                or!("beams", "toss bombs", "scent slingshot", "magnet gloves"),
                and!("feather L-2", "kill darknut (pit)")
            ),
        ),
        ("kill gleeok", or!("sword", "beams", "bombs", "fool's ore", "punch")),
        ("kill frypolar", or!(and!("bracelet", "mystery seeds"), "ember seeds")),
        ("kill medusa head", or!("sword", "fool's ore")),
        ("kill floormaster", or!("kill normal")),
        ("kill onox", and!("sword", "jump")),
    ]
}
