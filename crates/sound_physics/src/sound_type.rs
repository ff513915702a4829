//! Block sound types and their canonical names
//!
//! The host game assigns each sound type an internal identifier that is not
//! stable across versions (obfuscation/remapping), so every known sound type
//! carries a hard-coded canonical name here. Those names are what end up in
//! the reflectivity file.
//!
//! The table lives in exactly one place: the `sound_types!` invocation below
//! declares each variant together with its canonical name. The forward
//! direction is an exhaustive `match`; the reverse direction is an index
//! built once on first use.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

macro_rules! sound_types {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// A block sound type (material classification) reflectivity is keyed on
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum SoundType {
            $(
                #[doc = concat!("`", $name, "`")]
                $variant,
            )*
        }

        impl SoundType {
            /// Every known sound type, in declaration order
            pub const ALL: &'static [SoundType] = &[$(SoundType::$variant),*];

            /// Canonical name written to and read from the reflectivity file
            pub const fn name(self) -> &'static str {
                match self {
                    $(SoundType::$variant => $name,)*
                }
            }
        }
    };
}

sound_types! {
    Wood => "WOOD",
    Gravel => "GRAVEL",
    Grass => "GRASS",
    LilyPad => "LILY_PAD",
    Stone => "STONE",
    Metal => "METAL",
    Glass => "GLASS",
    Wool => "WOOL",
    Sand => "SAND",
    Snow => "SNOW",
    PowderSnow => "POWDER_SNOW",
    Ladder => "LADDER",
    Anvil => "ANVIL",
    SlimeBlock => "SLIME_BLOCK",
    HoneyBlock => "HONEY_BLOCK",
    WetGrass => "WET_GRASS",
    CoralBlock => "CORAL_BLOCK",
    Bamboo => "BAMBOO",
    BambooSapling => "BAMBOO_SAPLING",
    Scaffolding => "SCAFFOLDING",
    SweetBerryBush => "SWEET_BERRY_BUSH",
    Crop => "CROP",
    HardCrop => "HARD_CROP",
    Vine => "VINE",
    NetherWart => "NETHER_WART",
    Lantern => "LANTERN",
    Stem => "STEM",
    Nylium => "NYLIUM",
    Fungus => "FUNGUS",
    Roots => "ROOTS",
    Shroomlight => "SHROOMLIGHT",
    WeepingVines => "WEEPING_VINES",
    TwistingVines => "TWISTING_VINES",
    SoulSand => "SOUL_SAND",
    SoulSoil => "SOUL_SOIL",
    Basalt => "BASALT",
    WartBlock => "WART_BLOCK",
    Netherrack => "NETHERRACK",
    NetherBricks => "NETHER_BRICKS",
    NetherSprouts => "NETHER_SPROUTS",
    NetherOre => "NETHER_ORE",
    BoneBlock => "BONE_BLOCK",
    NetheriteBlock => "NETHERITE_BLOCK",
    AncientDebris => "ANCIENT_DEBRIS",
    Lodestone => "LODESTONE",
    Chain => "CHAIN",
    NetherGoldOre => "NETHER_GOLD_ORE",
    GildedBlackstone => "GILDED_BLACKSTONE",
    Candle => "CANDLE",
    Amethyst => "AMETHYST",
    AmethystCluster => "AMETHYST_CLUSTER",
    SmallAmethystBud => "SMALL_AMETHYST_BUD",
    MediumAmethystBud => "MEDIUM_AMETHYST_BUD",
    LargeAmethystBud => "LARGE_AMETHYST_BUD",
    Tuff => "TUFF",
    Calcite => "CALCITE",
    DripstoneBlock => "DRIPSTONE_BLOCK",
    PointedDripstone => "POINTED_DRIPSTONE",
    Copper => "COPPER",
    CaveVines => "CAVE_VINES",
    SporeBlossom => "SPORE_BLOSSOM",
    Azalea => "AZALEA",
    FloweringAzalea => "FLOWERING_AZALEA",
    MossCarpet => "MOSS_CARPET",
    Moss => "MOSS",
    BigDripleaf => "BIG_DRIPLEAF",
    SmallDripleaf => "SMALL_DRIPLEAF",
    RootedDirt => "ROOTED_DIRT",
    HangingRoots => "HANGING_ROOTS",
    AzaleaLeaves => "AZALEA_LEAVES",
    SculkSensor => "SCULK_SENSOR",
    GlowLichen => "GLOW_LICHEN",
    Deepslate => "DEEPSLATE",
    DeepslateBricks => "DEEPSLATE_BRICKS",
    DeepslateTiles => "DEEPSLATE_TILES",
    PolishedDeepslate => "POLISHED_DEEPSLATE",
}

/// Separator between words of a canonical name
const WORD_SEPARATOR: char = '_';

impl SoundType {
    /// Resolve a canonical name back to its sound type
    ///
    /// Matching is exact and case-sensitive. Returns `None` for names that
    /// don't belong to any known sound type (stale or hand-typed keys).
    pub fn from_name(name: &str) -> Option<Self> {
        NameRegistry::global().category_of(name)
    }

    /// Human-readable label, e.g. `NETHER_GOLD_ORE` -> `"Nether Gold Ore"`
    pub fn display_name(self) -> String {
        let mut label = String::with_capacity(self.name().len());

        for word in self.name().split(WORD_SEPARATOR).filter(|w| !w.is_empty()) {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                label.extend(first.to_uppercase());
                label.push_str(&chars.as_str().to_lowercase());
                label.push(' ');
            }
        }

        label.truncate(label.trim_end().len());
        label
    }
}

impl fmt::Display for SoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when parsing a name that isn't a known sound type
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown sound type: {0}")]
pub struct UnknownSoundType(pub String);

impl FromStr for SoundType {
    type Err = UnknownSoundType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownSoundType(s.to_string()))
    }
}

/// Process-wide bidirectional table between sound types and canonical names
///
/// Read-only after construction. Obtain it with [`NameRegistry::global`].
#[derive(Debug)]
pub struct NameRegistry {
    by_name: HashMap<&'static str, SoundType>,
}

static REGISTRY: OnceLock<NameRegistry> = OnceLock::new();

impl NameRegistry {
    fn build() -> Self {
        let by_name = SoundType::ALL
            .iter()
            .map(|&sound_type| (sound_type.name(), sound_type))
            .collect();
        Self { by_name }
    }

    /// The shared registry, built on first access
    pub fn global() -> &'static Self {
        REGISTRY.get_or_init(Self::build)
    }

    /// Canonical name of a sound type
    pub const fn name_of(&self, sound_type: SoundType) -> &'static str {
        sound_type.name()
    }

    /// Sound type for a canonical name, `None` on a miss
    pub fn category_of(&self, name: &str) -> Option<SoundType> {
        self.by_name.get(name).copied()
    }

    /// Display label of a sound type
    pub fn display_name_of(&self, sound_type: SoundType) -> String {
        sound_type.display_name()
    }

    /// All known sound types in declaration order
    pub fn iter(&self) -> impl Iterator<Item = SoundType> + '_ {
        SoundType::ALL.iter().copied()
    }

    /// Number of known sound types
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether the registry knows no sound types
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
