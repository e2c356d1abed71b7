// Capabilities derived from the items in the inventory. The kill table refers
// to these by name ("jump", "any slingshot") rather than to concrete items, so
// that item upgrades and seed trees are accounted for in one place.
//
// Seeds are only usable once both a seed item and the matching tree have been
// reached, so the trees are atoms in their own right.

use oosrando_logic::{Requirement, and, or};

pub fn item_nodes() -> Vec<(&'static str, Requirement)> {
    vec![
        ("sword", or!("sword L-1", "sword L-2")),
        ("beams", and!("sword", "energy ring")),
        ("boomerang", or!("boomerang L-1", "boomerang L-2")),
        ("shield", or!("shield L-1", "shield L-2")),
        ("punch", or!("fist ring", "expert's ring")),
        ("jump", or!("feather L-1", "feather L-2")),
        ("long jump", or!("feather L-2")),
        ("slingshot", or!("slingshot L-1", "slingshot L-2")),
        ("seed item", or!("satchel", "slingshot")),
        ("ember seeds", and!("seed item", "ember tree")),
        ("scent seeds", and!("seed item", "scent tree")),
        ("gale seeds", and!("seed item", "gale tree")),
        ("mystery seeds", and!("seed item", "mystery tree")),
        ("gale satchel", and!("satchel", "gale tree")),
        ("gale slingshot", and!("slingshot", "gale tree")),
        ("scent slingshot", and!("slingshot", "scent tree")),
        ("pegasus slingshot", and!("slingshot", "pegasus tree")),
        (
            "any slingshot",
            and!(
                "slingshot",
                or!("ember tree", "scent tree", "gale tree", "pegasus tree", "mystery tree")
            ),
        ),
    ]
}
