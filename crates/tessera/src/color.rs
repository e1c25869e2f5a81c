//! Nearest-color matching against the xterm 256-color palette.

/// Intensity steps of the 6x6x6 color cube.
const CUBE: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// The 16 system colors as xterm renders them.
const SYSTEM: [(u8, u8, u8); 16] = [
    (0, 0, 0),
    (128, 0, 0),
    (0, 128, 0),
    (128, 128, 0),
    (0, 0, 128),
    (128, 0, 128),
    (0, 128, 128),
    (192, 192, 192),
    (128, 128, 128),
    (255, 0, 0),
    (0, 255, 0),
    (255, 255, 0),
    (0, 0, 255),
    (255, 0, 255),
    (0, 255, 255),
    (255, 255, 255),
];

/// Convert a palette index to RGB.
pub fn ansi_to_rgb(n: u8) -> (u8, u8, u8) {
    match n {
        0..=15 => SYSTEM[n as usize],
        16..=231 => {
            let n = n - 16;
            (
                CUBE[(n / 36) as usize],
                CUBE[((n / 6) % 6) as usize],
                CUBE[(n % 6) as usize],
            )
        }
        232..=255 => {
            let v = 8 + (n - 232) * 10;
            (v, v, v)
        }
    }
}

/// Squared euclidean distance in RGB space.
fn distance(a: (u8, u8, u8), b: (u8, u8, u8)) -> u32 {
    let d = |x: u8, y: u8| {
        let v = i32::from(x) - i32::from(y);
        (v * v) as u32
    };
    d(a.0, b.0) + d(a.1, b.1) + d(a.2, b.2)
}

/// Find the palette index closest to an RGB value. Ties resolve to the lower
/// index, so exact system colors map onto themselves.
pub fn match_rgb(r: u8, g: u8, b: u8) -> u8 {
    let target = (r, g, b);
    let mut best = 0u8;
    let mut best_d = u32::MAX;
    for n in 0..=255u8 {
        let d = distance(target, ansi_to_rgb(n));
        if d < best_d {
            best = n;
            best_d = d;
            if d == 0 {
                break;
            }
        }
    }
    best
}
