//! Pokeview Type Palette
//!
//! Static lookup from a Pokémon type name to the style used for its badge.
//! Lookups are case-insensitive and never fail: unknown names resolve to
//! [`FALLBACK_STYLE`].
//!
//! ```
//! use pokeview_theme::{color_for, FALLBACK_STYLE};
//!
//! assert_eq!(color_for("Fire"), "bg-red-500");
//! assert_eq!(color_for("UNKNOWN_TYPE"), FALLBACK_STYLE);
//! ```

mod types;

pub use types::{ParseTypeError, PokemonType};

/// Neutral style for unknown types
pub const FALLBACK_STYLE: &str = "bg-gray-500";

/// Neutral swatch for unknown types (`gray-500`)
pub const FALLBACK_HEX: u32 = 0x6B7280;

/// Style class for a type name, case-insensitive
pub fn color_for(type_name: &str) -> &'static str {
    type_name
        .parse::<PokemonType>()
        .map(|ty| ty.style_class())
        .unwrap_or(FALLBACK_STYLE)
}

/// RGB swatch for a type name, case-insensitive
pub fn hex_for(type_name: &str) -> u32 {
    type_name
        .parse::<PokemonType>()
        .map(|ty| ty.hex())
        .unwrap_or(FALLBACK_HEX)
}
