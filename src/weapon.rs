//! Weapon profiles.
//!
//! Static per-weapon timing constants mirroring real fencing equipment.
//! Leaf module, no dependencies.

/// Weapon discipline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Weapon {
    Foil = 0,
    Sabre = 1,
    Epee = 2,
}

impl Weapon {
    /// Cycle to the next weapon (Foil -> Sabre -> Epee -> Foil).
    ///
    /// Used by the desk's select button during weapon selection.
    pub fn next(self) -> Self {
        match self {
            Weapon::Foil => Weapon::Sabre,
            Weapon::Sabre => Weapon::Epee,
            Weapon::Epee => Weapon::Foil,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Weapon::Foil => "Foil",
            Weapon::Sabre => "Sabre",
            Weapon::Epee => "Epee",
        }
    }

    /// Timing profile for this weapon.
    pub const fn profile(self) -> &'static WeaponProfile {
        &PROFILES[self as usize]
    }
}

/// Per-weapon timing constants.
///
/// `min_contact_cycles` is the number of consecutive sensing cycles a
/// contact must stay triggered before it resolves into a hit; shorter
/// contacts are treated as noise. `lockout_ms` is the desk-side window
/// after the first hit during which the other fencer can still score
/// (simultaneous-touch rules).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeaponProfile {
    pub weapon: Weapon,
    pub min_contact_cycles: u32,
    pub lockout_ms: u32,
}

/// Fixed profile table, indexed by `Weapon as usize`.
pub const PROFILES: [WeaponProfile; 3] = [
    WeaponProfile {
        weapon: Weapon::Foil,
        min_contact_cycles: 14,
        lockout_ms: 300,
    },
    WeaponProfile {
        weapon: Weapon::Sabre,
        min_contact_cycles: 1,
        lockout_ms: 170,
    },
    WeaponProfile {
        weapon: Weapon::Epee,
        min_contact_cycles: 5,
        lockout_ms: 45,
    },
];
