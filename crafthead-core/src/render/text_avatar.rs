// File: crafthead-core/src/render/text_avatar.rs

use image::{Rgba, RgbaImage};

/// 5x7 bitmap glyphs, one byte per row, high bit on the left.
#[rustfmt::skip]
fn glyph(c: char) -> Option<[u8; 7]> {
    let rows = match c.to_ascii_uppercase() {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x1E, 0x11, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x1E, 0x10, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x1E, 0x10, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0E],
        'H' => [0x11, 0x11, 0x1F, 0x11, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x1C, 0x12, 0x11, 0x11, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x19, 0x15, 0x13, 0x11, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0E, 0x11, 0x10, 0x0E, 0x01, 0x11, 0x0E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x06, 0x08, 0x10, 0x1F],
        '3' => [0x0E, 0x11, 0x01, 0x06, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '_' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1F],
        _ => return None,
    };
    Some(rows)
}

const GLYPH_W: i64 = 5;
const GLYPH_H: i64 = 7;

fn name_hash(name: &str) -> u32 {
    name.to_lowercase()
        .bytes()
        .fold(0u32, |h, b| h.wrapping_mul(31).wrapping_add(b as u32))
}

/// Background colour: hue from the name hash, fixed saturation/lightness.
pub fn background_for(name: &str) -> Rgba<u8> {
    let hue = (name_hash(name) % 360) as f32;
    let (s, l) = (0.65f32, 0.45f32);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;
    let (r, g, b) = match (hue / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let to_u8 = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgba([to_u8(r), to_u8(g), to_u8(b), 255])
}

/// White on dark backgrounds, near-black on light ones.
pub fn foreground_for(bg: Rgba<u8>) -> Rgba<u8> {
    let lum = 0.2126 * bg[0] as f32 + 0.7152 * bg[1] as f32 + 0.0722 * bg[2] as f32;
    if lum > 127.5 {
        Rgba([30, 30, 30, 255])
    } else {
        Rgba([255, 255, 255, 255])
    }
}

/// Up to two initials: the first character, plus the first capital that
/// follows a lowercase letter. Names of one or two characters are used whole.
pub fn initials(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    match chars.len() {
        0 => return String::new(),
        1 | 2 => return chars.iter().map(|c| c.to_ascii_uppercase()).collect(),
        _ => {}
    }

    let mut out = String::new();
    out.push(chars[0].to_ascii_uppercase());
    if let Some(w) = chars
        .windows(2)
        .find(|w| w[0].is_ascii_lowercase() && w[1].is_ascii_uppercase())
    {
        out.push(w[1]);
    }
    out
}

/// Square avatar with the name's initials, never panicking for tiny sizes.
pub fn render_text_avatar(name: &str, size: u32) -> RgbaImage {
    let size = size.max(1);
    let bg = background_for(name);
    let fg = foreground_for(bg);
    let mut img = RgbaImage::from_pixel(size, size, bg);

    let letters: Vec<[u8; 7]> = initials(name).chars().filter_map(glyph).collect();
    if letters.is_empty() {
        return img;
    }

    let n = letters.len() as i64;
    let side = size as i64;
    // ~60% of the height, but never wider than the image.
    let by_height = (side * 6 / 10) / GLYPH_H;
    let by_width = side / (n * (GLYPH_W + 1));
    let scale = by_height.min(by_width).max(1);

    let text_w = n * GLYPH_W * scale + (n - 1) * scale;
    let text_h = GLYPH_H * scale;
    let origin_x = (side - text_w) / 2;
    let origin_y = (side - text_h) / 2;

    for (i, rows) in letters.iter().enumerate() {
        let gx = origin_x + i as i64 * (GLYPH_W + 1) * scale;
        draw_glyph(&mut img, rows, gx, origin_y, scale, fg);
    }
    img
}

fn draw_glyph(img: &mut RgbaImage, rows: &[u8; 7], x: i64, y: i64, scale: i64, color: Rgba<u8>) {
    let (w, h) = (img.width() as i64, img.height() as i64);
    for (row, bits) in rows.iter().enumerate() {
        for col in 0..GLYPH_W {
            if (*bits >> (GLYPH_W - 1 - col)) & 1 == 0 {
                continue;
            }
            for dy in 0..scale {
                for dx in 0..scale {
                    let px = x + col * scale + dx;
                    let py = y + row as i64 * scale + dy;
                    if (0..w).contains(&px) && (0..h).contains(&py) {
                        img.put_pixel(px as u32, py as u32, color);
                    }
                }
            }
        }
    }
}
