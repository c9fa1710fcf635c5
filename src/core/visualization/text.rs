// src/core/visualization/text.rs
//
// Text rasterization from the 8x8 const bitmap font. Each glyph row is
// one byte; bit 0 is the leftmost pixel.

use font8x8::legacy::BASIC_LEGACY;
use image::{Rgb, RgbImage};

pub const GLYPH_SIZE: u32 = 8;

/// Pixel width of `text` at the given integer scale.
pub fn text_width(text: &str, scale: u32) -> u32 {
    text.chars().count() as u32 * GLYPH_SIZE * scale
}

/// Draw `text` with its top-left corner at (x, y). Pixels falling
/// outside the image are dropped.
pub fn draw_text(img: &mut RgbImage, x: i32, y: i32, text: &str, scale: u32, color: Rgb<u8>) {
    let mut cursor = x;
    for ch in text.chars() {
        let glyph = glyph_for(ch);
        for (row, &bits) in glyph.iter().enumerate() {
            for col in 0..8u32 {
                if bits >> col & 1 == 1 {
                    fill_block(
                        img,
                        cursor + (col * scale) as i32,
                        y + (row as u32 * scale) as i32,
                        scale,
                        color,
                    );
                }
            }
        }
        cursor += (GLYPH_SIZE * scale) as i32;
    }
}

/// Draw `text` rotated 90 degrees counterclockwise, reading
/// bottom-to-top, with the first character's block at (x, y).
pub fn draw_text_vertical(img: &mut RgbImage, x: i32, y: i32, text: &str, scale: u32, color: Rgb<u8>) {
    let mut cursor = y;
    for ch in text.chars() {
        let glyph = glyph_for(ch);
        for (row, &bits) in glyph.iter().enumerate() {
            for col in 0..8u32 {
                if bits >> col & 1 == 1 {
                    fill_block(
                        img,
                        x + (row as u32 * scale) as i32,
                        cursor + ((7 - col) * scale) as i32,
                        scale,
                        color,
                    );
                }
            }
        }
        cursor -= (GLYPH_SIZE * scale) as i32;
    }
}

fn glyph_for(ch: char) -> [u8; 8] {
    let index = ch as usize;
    if index < BASIC_LEGACY.len() {
        BASIC_LEGACY[index]
    } else {
        BASIC_LEGACY[b'?' as usize]
    }
}

fn fill_block(img: &mut RgbImage, x: i32, y: i32, scale: u32, color: Rgb<u8>) {
    for dy in 0..scale as i32 {
        for dx in 0..scale as i32 {
            let (px, py) = (x + dx, y + dy);
            if px >= 0 && py >= 0 && (px as u32) < img.width() && (py as u32) < img.height() {
                img.put_pixel(px as u32, py as u32, color);
            }
        }
    }
}
