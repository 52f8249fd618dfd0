//! The eighteen Pokémon types and their badge styles

use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Type name that matches no known type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown Pokémon type: {0}")]
pub struct ParseTypeError(pub String);

/// A Pokémon type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PokemonType {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

impl PokemonType {
    /// Every type, in national-dex order
    pub const ALL: [PokemonType; 18] = [
        PokemonType::Normal,
        PokemonType::Fire,
        PokemonType::Water,
        PokemonType::Electric,
        PokemonType::Grass,
        PokemonType::Ice,
        PokemonType::Fighting,
        PokemonType::Poison,
        PokemonType::Ground,
        PokemonType::Flying,
        PokemonType::Psychic,
        PokemonType::Bug,
        PokemonType::Rock,
        PokemonType::Ghost,
        PokemonType::Dragon,
        PokemonType::Dark,
        PokemonType::Steel,
        PokemonType::Fairy,
    ];

    /// Lowercase API name
    pub fn name(&self) -> &'static str {
        match self {
            PokemonType::Normal => "normal",
            PokemonType::Fire => "fire",
            PokemonType::Water => "water",
            PokemonType::Electric => "electric",
            PokemonType::Grass => "grass",
            PokemonType::Ice => "ice",
            PokemonType::Fighting => "fighting",
            PokemonType::Poison => "poison",
            PokemonType::Ground => "ground",
            PokemonType::Flying => "flying",
            PokemonType::Psychic => "psychic",
            PokemonType::Bug => "bug",
            PokemonType::Rock => "rock",
            PokemonType::Ghost => "ghost",
            PokemonType::Dragon => "dragon",
            PokemonType::Dark => "dark",
            PokemonType::Steel => "steel",
            PokemonType::Fairy => "fairy",
        }
    }

    /// Badge background class
    pub fn style_class(&self) -> &'static str {
        match self {
            PokemonType::Normal => "bg-gray-400",
            PokemonType::Fire => "bg-red-500",
            PokemonType::Water => "bg-blue-500",
            PokemonType::Electric => "bg-yellow-400",
            PokemonType::Grass => "bg-green-500",
            PokemonType::Ice => "bg-blue-200",
            PokemonType::Fighting => "bg-red-700",
            PokemonType::Poison => "bg-purple-500",
            PokemonType::Ground => "bg-yellow-600",
            PokemonType::Flying => "bg-indigo-400",
            PokemonType::Psychic => "bg-pink-500",
            PokemonType::Bug => "bg-green-400",
            PokemonType::Rock => "bg-yellow-800",
            PokemonType::Ghost => "bg-purple-700",
            PokemonType::Dragon => "bg-indigo-700",
            PokemonType::Dark => "bg-gray-800",
            PokemonType::Steel => "bg-gray-500",
            PokemonType::Fairy => "bg-pink-300",
        }
    }

    /// RGB swatch matching [`style_class`](Self::style_class)
    pub fn hex(&self) -> u32 {
        match self {
            PokemonType::Normal => 0x9CA3AF,
            PokemonType::Fire => 0xEF4444,
            PokemonType::Water => 0x3B82F6,
            PokemonType::Electric => 0xFACC15,
            PokemonType::Grass => 0x22C55E,
            PokemonType::Ice => 0xBFDBFE,
            PokemonType::Fighting => 0xB91C1C,
            PokemonType::Poison => 0xA855F7,
            PokemonType::Ground => 0xCA8A04,
            PokemonType::Flying => 0x818CF8,
            PokemonType::Psychic => 0xEC4899,
            PokemonType::Bug => 0x4ADE80,
            PokemonType::Rock => 0x854D0E,
            PokemonType::Ghost => 0x7E22CE,
            PokemonType::Dragon => 0x4338CA,
            PokemonType::Dark => 0x1F2937,
            PokemonType::Steel => 0x6B7280,
            PokemonType::Fairy => 0xF9A8D4,
        }
    }
}

impl FromStr for PokemonType {
    type Err = ParseTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PokemonType::ALL
            .iter()
            .copied()
            .find(|ty| ty.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseTypeError(s.to_string()))
    }
}

impl fmt::Display for PokemonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl<'de> Deserialize<'de> for PokemonType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_round_trip_names() {
        for ty in PokemonType::ALL {
            assert_eq!(ty.name().parse::<PokemonType>(), Ok(ty));
            assert_eq!(ty.to_string(), ty.name());
        }
    }

    #[test]
    fn test_styles_are_distinct() {
        let styles: HashSet<&str> = PokemonType::ALL.iter().map(|t| t.style_class()).collect();
        assert_eq!(styles.len(), PokemonType::ALL.len());
    }

    #[test]
    fn test_parse_error() {
        let err = "Shadow".parse::<PokemonType>().unwrap_err();
        assert_eq!(err, ParseTypeError("Shadow".to_string()));
    }

    #[test]
    fn test_deserialize_types_list() {
        let types: Vec<PokemonType> = serde_json::from_str(r#"["grass", "Poison"]"#).unwrap();
        assert_eq!(types, vec![PokemonType::Grass, PokemonType::Poison]);

        assert!(serde_json::from_str::<PokemonType>(r#""shadow""#).is_err());
    }
}
