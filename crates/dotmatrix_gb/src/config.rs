use typed_builder::TypedBuilder;

/// Power-on options for a [`GameBoy`](crate::GameBoy) session.
///
/// Defaults match DMG hardware. `from_env` lets test harnesses and the
/// headless runner tweak them without recompiling.
#[derive(Clone, Debug, PartialEq, Eq, TypedBuilder)]
pub struct MachineConfig {
    /// Maximum number of sprites composited on a single scanline.
    #[builder(default = 10)]
    pub sprite_limit: usize,
    /// Seed for the xorshift fill of WRAM/HRAM; `None` zero-fills.
    #[builder(default = Some(DEFAULT_RAM_SEED))]
    pub ram_seed: Option<u32>,
    /// Refuse ROMs whose header checksum (0x014D) does not match.
    #[builder(default = false)]
    pub strict_header_checksum: bool,
    /// How many undefined-opcode diagnostics are kept before the oldest is dropped.
    #[builder(default = 64)]
    pub diagnostic_capacity: usize,
}

pub const DEFAULT_RAM_SEED: u32 = 0xC0DE_1234;

impl Default for MachineConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl MachineConfig {
    /// Defaults overlaid with `DOTMATRIX_*` environment variables.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(value) = env_var("DOTMATRIX_SPRITE_LIMIT") {
            match value.parse::<usize>() {
                Ok(limit) => config.sprite_limit = limit,
                Err(_) => log::warn!("ignoring DOTMATRIX_SPRITE_LIMIT={value:?}"),
            }
        }

        if let Some(value) = env_var("DOTMATRIX_RAM_SEED") {
            match parse_seed(&value) {
                Some(seed) => config.ram_seed = seed,
                None => log::warn!("ignoring DOTMATRIX_RAM_SEED={value:?}"),
            }
        }

        if let Some(value) = env_var("DOTMATRIX_STRICT_CHECKSUM") {
            config.strict_header_checksum = matches!(value.as_str(), "1" | "true" | "yes");
        }

        config
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().map(|v| v.trim().to_string())
}

/// `none` disables seeding; `0x`-prefixed values are hex.
fn parse_seed(value: &str) -> Option<Option<u32>> {
    if value.eq_ignore_ascii_case("none") {
        return Some(None);
    }
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => value.parse::<u32>().ok(),
    };
    parsed.map(Some)
}
