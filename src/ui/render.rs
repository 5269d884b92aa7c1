// Software drawing primitives over a softbuffer framebuffer (u32 per pixel,
// 0x00RRGGBB).

use ivgrid::DecodedImage;

pub const BG_COLOR: [u8; 3] = [30, 30, 30];
pub const CURRENT_BORDER: (u8, u8, u8, u8) = (255, 109, 18, 255);
pub const CURRENT_BORDER_WIDTH: u32 = 4;
pub const SELECTED_BORDER: (u8, u8, u8, u8) = (43, 150, 18, 255);
pub const SELECTED_BORDER_WIDTH: u32 = 5;

/// Pack RGB into softbuffer u32 format: 0x00RRGGBB.
pub fn rgb(r: u8, g: u8, b: u8) -> u32 {
    (r as u32) << 16 | (g as u32) << 8 | b as u32
}

fn unpack_rgb(v: u32) -> (u8, u8, u8) {
    ((v >> 16) as u8, (v >> 8) as u8, v as u8)
}

fn blend(dst: u32, r: u8, g: u8, b: u8, a: u32) -> u32 {
    if a == 255 {
        return rgb(r, g, b);
    }
    let inv = 255 - a;
    let (dr, dg, db) = unpack_rgb(dst);
    rgb(
        ((r as u32 * a + dr as u32 * inv) / 255) as u8,
        ((g as u32 * a + dg as u32 * inv) / 255) as u8,
        ((b as u32 * a + db as u32 * inv) / 255) as u8,
    )
}

/// Fill a rectangle with a color (with alpha blending).
pub fn fill_rect(
    buf: &mut [u32],
    stride: u32,
    buf_h: u32,
    rx: i32,
    ry: i32,
    rw: u32,
    rh: u32,
    color: (u8, u8, u8, u8),
) {
    let x_start = rx.max(0) as u32;
    let y_start = ry.max(0) as u32;
    let x_end = (rx as i64 + rw as i64).clamp(0, stride as i64) as u32;
    let y_end = (ry as i64 + rh as i64).clamp(0, buf_h as i64) as u32;
    for y in y_start..y_end {
        for x in x_start..x_end {
            let off = (y * stride + x) as usize;
            buf[off] = blend(buf[off], color.0, color.1, color.2, color.3 as u32);
        }
    }
}

/// Rectangle outline of `width` pixels drawn inside the given bounds.
pub fn outline_rect(
    buf: &mut [u32],
    stride: u32,
    buf_h: u32,
    rx: i32,
    ry: i32,
    rw: u32,
    rh: u32,
    width: u32,
    color: (u8, u8, u8, u8),
) {
    let w = width.min(rw).min(rh);
    fill_rect(buf, stride, buf_h, rx, ry, rw, w, color);
    fill_rect(buf, stride, buf_h, rx, ry + (rh - w) as i32, rw, w, color);
    fill_rect(buf, stride, buf_h, rx, ry, w, rh, color);
    fill_rect(buf, stride, buf_h, rx + (rw - w) as i32, ry, w, rh, color);
}

pub fn fit_scale(img_w: f32, img_h: f32, win_w: f32, win_h: f32) -> f32 {
    (win_w / img_w).min(win_h / img_h)
}

/// Nearest-neighbour blit of `src` with its top-left corner at (x0, y0).
pub fn blit_scaled(
    dst: &mut [u32],
    dst_w: u32,
    dst_h: u32,
    src: &DecodedImage,
    x0: f32,
    y0: f32,
    scale: f32,
) {
    if scale <= 0.0 || src.width == 0 || src.height == 0 {
        return;
    }
    let draw_w = src.width as f32 * scale;
    let draw_h = src.height as f32 * scale;

    let dx_start = x0.max(0.0) as u32;
    let dy_start = y0.max(0.0) as u32;
    let dx_end = (x0 + draw_w).ceil().clamp(0.0, dst_w as f32) as u32;
    let dy_end = (y0 + draw_h).ceil().clamp(0.0, dst_h as f32) as u32;

    let inv_scale = 1.0 / scale;
    let pixels = &src.rgba_bytes;

    for dy in dy_start..dy_end {
        let sy = ((dy as f32 - y0) * inv_scale) as u32;
        if sy >= src.height {
            continue;
        }
        for dx in dx_start..dx_end {
            let sx = ((dx as f32 - x0) * inv_scale) as u32;
            if sx >= src.width {
                continue;
            }

            let si = (sy as usize * src.width as usize + sx as usize) * 4;
            let di = dy as usize * dst_w as usize + dx as usize;
            let sa = pixels[si + 3] as u32;
            if sa > 0 {
                dst[di] = blend(dst[di], pixels[si], pixels[si + 1], pixels[si + 2], sa);
            }
        }
    }
}
