//! Static, read-only content tables: item/horse/housing template
//! catalogs and the like. Game-balance content itself is out of scope
//! here; what's modeled is the init/teardown shape a real catalog would
//! plug into, plus the one lookup the directors actually call
//! (starter-horse template for character creation).

use std::collections::HashMap;

use alicia_protocol::model::Tid;

/// A minimal horse template: just enough for the character-creation
/// flow to stamp out a starter mount.
#[derive(Debug, Clone, Copy)]
pub struct HorseTemplate {
    pub tid: Tid,
}

/// Holds every static content table for one server instance. A real
/// catalog would load these from the resource directory named on the
/// CLI; this one seeds a single starter-horse template since that is
/// all character creation needs.
pub struct Registries {
    horse_templates: HashMap<u32, HorseTemplate>,
}

impl Registries {
    /// Loads (or, here, seeds) every static table. Named `init` rather
    /// than `new` to mirror the one-time, fallible-in-a-real-catalog
    /// nature of a content load.
    pub fn init() -> Self {
        let mut horse_templates = HashMap::new();
        horse_templates.insert(1, HorseTemplate { tid: Tid(1) });
        Self { horse_templates }
    }

    pub fn starter_horse_template(&self) -> HorseTemplate {
        self.horse_templates.get(&1).copied().unwrap_or(HorseTemplate { tid: Tid(1) })
    }

    /// No-op today: a real catalog would release mapped resource files
    /// here. Kept so callers don't need to know that.
    pub fn teardown(&self) {}
}

impl Default for Registries {
    fn default() -> Self {
        Self::init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starter_template_is_always_available() {
        let registries = Registries::init();
        assert_eq!(registries.starter_horse_template().tid, Tid(1));
    }
}
