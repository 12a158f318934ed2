use egui::Color32;

/// The ten-colour categorical scheme used for selected regions.
pub const CATEGORY10: [Color32; 10] = [
    Color32::from_rgb(0x1f, 0x77, 0xb4),
    Color32::from_rgb(0xff, 0x7f, 0x0e),
    Color32::from_rgb(0x2c, 0xa0, 0x2c),
    Color32::from_rgb(0xd6, 0x27, 0x28),
    Color32::from_rgb(0x94, 0x67, 0xbd),
    Color32::from_rgb(0x8c, 0x56, 0x4b),
    Color32::from_rgb(0xe3, 0x77, 0xc2),
    Color32::from_rgb(0x7f, 0x7f, 0x7f),
    Color32::from_rgb(0xbc, 0xbd, 0x22),
    Color32::from_rgb(0x17, 0xbe, 0xcf),
];

/// Colour of the all-federation curve.
pub const NEUTRAL: Color32 = Color32::from_rgb(0x99, 0x99, 0x99);

/// FNV-1a over the key's bytes. Not cryptographic; only used to bucket
/// keys into palette slots.
pub fn key_hash(key: &str) -> u64 {
    const OFFSET_BASIS: u64 = 14695981039346656037;
    const PRIME: u64 = 1099511628211;

    key.bytes().fold(OFFSET_BASIS, |hash, b| {
        (hash ^ b as u64).wrapping_mul(PRIME)
    })
}

/// Stable palette colour for a region id.
pub fn categorical(key: &str) -> Color32 {
    let slot = (key_hash(key) % CATEGORY10.len() as u64) as usize;
    CATEGORY10[slot]
}
