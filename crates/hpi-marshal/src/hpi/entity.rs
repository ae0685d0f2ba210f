// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Entities and entity paths.

use super::hpi_u32_newtype;
use crate::Marshal;

pub const MAX_ENTITY_PATH: usize = 16;

/// `SaHpiEntityTypeT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EntityType(pub u32);

impl EntityType {
    pub const UNSPECIFIED: Self = Self(0);
    pub const OTHER: Self = Self(1);
    pub const PROCESSOR: Self = Self(3);
    pub const DISK_BAY: Self = Self(4);
    pub const SYSTEM_BOARD: Self = Self(7);
    pub const POWER_SUPPLY: Self = Self(10);
    pub const SYSTEM_CHASSIS: Self = Self(23);
    pub const COOLING_DEVICE: Self = Self(29);
    pub const BATTERY: Self = Self(40);
    /// Terminates a path shorter than [`MAX_ENTITY_PATH`].
    pub const ROOT: Self = Self(0xFFFF);
    pub const RACK: Self = Self(0x10000);
    pub const SUBRACK: Self = Self(0x10001);
    pub const SYSTEM_SLOT: Self = Self(0x10004);
    pub const SBC_BLADE: Self = Self(0x10005);
}

hpi_u32_newtype!(EntityType);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Marshal)]
pub struct Entity {
    pub entity_type: EntityType,
    pub entity_location: u32,
}

impl Entity {
    pub const fn new(entity_type: EntityType, entity_location: u32) -> Self {
        Self {
            entity_type,
            entity_location,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Marshal)]
pub struct EntityPath {
    pub entry: [Entity; MAX_ENTITY_PATH],
}

impl EntityPath {
    /// Path from the innermost entity outwards, terminated with a root entry.
    ///
    /// Entries beyond the last slot are dropped.
    pub fn new(entries: &[Entity]) -> Self {
        let mut entry = [Entity::default(); MAX_ENTITY_PATH];
        let used = entries.len().min(MAX_ENTITY_PATH);
        entry[..used].copy_from_slice(&entries[..used]);
        if used < MAX_ENTITY_PATH {
            entry[used] = Entity::new(EntityType::ROOT, 0);
        }
        Self { entry }
    }

    /// Entries before the root terminator.
    pub fn entries(&self) -> &[Entity] {
        let end = self
            .entry
            .iter()
            .position(|e| e.entity_type == EntityType::ROOT)
            .unwrap_or(MAX_ENTITY_PATH);
        &self.entry[..end]
    }
}
