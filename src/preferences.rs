//! Account-level engine preference ordering
//!
//! Accounts can steer which provider handles their translations, either
//! globally (`general_order`) or per language pair (`pairs`). Preferences are
//! supplied by the caller on each translation call and never persisted here.
//!
//! Ordering is a stable two-pass sort: the general order is applied first
//! (engines named there sort before unnamed ones, in the given order), then a
//! matching pair preference moves its engine to the front, taking precedence
//! over the general order. Pair keys are `"src:tgt"`, `"src:any"` and
//! `"any:tgt"`, consulted in that priority.

use crate::engines::{Engine, EngineType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-account machine translation preferences, scoped to a single call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountMtPreferences {
    /// Preferred engine order for all language pairs
    pub general_order: Option<Vec<EngineType>>,
    /// Pair-specific overrides keyed `"src:tgt"`, `"src:any"` or `"any:tgt"`
    pub pairs: Option<HashMap<String, EngineType>>,
}

impl AccountMtPreferences {
    /// The pair override for a language pair, if any
    pub fn pair_override(&self, source: &str, target: &str) -> Option<EngineType> {
        let pairs = self.pairs.as_ref()?;
        let keys = [
            format!("{}:{}", source, target),
            format!("{}:any", source),
            format!("any:{}", target),
        ];
        keys.iter().find_map(|key| pairs.get(key).copied())
    }
}

/// Stable sort placing engines named in `general_order` first, in that order
///
/// Engines not named keep their relative order behind the named ones.
pub fn sort_by_general_order(engines: &mut [Engine], general_order: Option<&[EngineType]>) {
    let Some(order) = general_order else {
        return;
    };
    engines.sort_by_key(|engine| {
        order
            .iter()
            .position(|t| *t == engine.engine_type())
            .unwrap_or(usize::MAX)
    });
}

/// Move the pair-preferred engine to the front, keeping the rest stable
pub fn apply_pair_override(engines: &mut Vec<Engine>, preferred: Option<EngineType>) {
    let Some(preferred) = preferred else {
        return;
    };
    if let Some(index) = engines
        .iter()
        .position(|engine| engine.engine_type() == preferred)
    {
        let engine = engines.remove(index);
        engines.insert(0, engine);
    }
}
