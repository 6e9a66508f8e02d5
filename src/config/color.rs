use crate::config::model::InterpolateColor;
use crate::foundation::core::Rgb8;

/// Parse a tint string: `#RRGGBB`, `RRGGBB`, `0xRRGGBB`, `#RGB`, or `#RRGGBBAA` (alpha ignored).
pub fn parse_tint(s: &str) -> Option<Rgb8> {
    let s = s.trim();
    let s = s
        .strip_prefix('#')
        .or_else(|| s.strip_prefix("0x"))
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);

    fn hex_byte(pair: &str) -> Option<u8> {
        u8::from_str_radix(pair, 16).ok()
    }

    if !s.is_ascii() {
        return None;
    }
    match s.len() {
        3 => {
            let mut ch = s.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
            Some(Rgb8::new(ch.next()??, ch.next()??, ch.next()??))
        }
        6 | 8 => Some(Rgb8::new(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        )),
        _ => None,
    }
}

/// Resolve a configured tint, optionally blended toward `interpolate.color2`.
///
/// The blend happens in HSV space along the shortest hue arc. Returns `None` when there is no
/// usable base tint.
pub fn interpolate_color(tint: Option<&str>, interpolate: Option<&InterpolateColor>) -> Option<Rgb8> {
    let raw = tint.filter(|t| !t.trim().is_empty())?;
    let Some(base) = parse_tint(raw) else {
        tracing::warn!(tint = raw, "unparseable tint; falling back to white");
        return None;
    };

    let Some(interp) = interpolate else {
        return Some(base);
    };
    let prc = if interp.prc.is_finite() {
        interp.prc.clamp(0.0, 1.0)
    } else {
        0.0
    };
    if prc == 0.0 {
        return Some(base);
    }
    let Some(target) = interp.color2.as_deref().and_then(parse_tint) else {
        return Some(base);
    };

    let (h0, s0, v0) = rgb_to_hsv(base);
    let (h1, s1, v1) = rgb_to_hsv(target);

    let delta_hue = h1 - h0;
    let delta_angle = if delta_hue.abs() > 180.0 {
        delta_hue + if delta_hue < 0.0 { 360.0 } else { -360.0 }
    } else {
        delta_hue
    };

    let h = (h0 + delta_angle * prc).rem_euclid(360.0);
    let s = (1.0 - prc) * s0 + prc * s1;
    let v = (1.0 - prc) * v0 + prc * v1;
    Some(hsv_to_rgb(h, s, v))
}

/// Hue in degrees, saturation and value in `[0, 1]`.
fn rgb_to_hsv(c: Rgb8) -> (f64, f64, f64) {
    let r = f64::from(c.r) / 255.0;
    let g = f64::from(c.g) / 255.0;
    let b = f64::from(c.b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let d = max - min;

    let h = if d == 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / d).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / d + 2.0)
    } else {
        60.0 * ((r - g) / d + 4.0)
    };
    let s = if max == 0.0 { 0.0 } else { d / max };
    (h, s, max)
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb8 {
    let s = s.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);
    let c = v * s;
    let hp = h.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (hp.rem_euclid(2.0) - 1.0).abs());

    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;

    fn to_u8(x: f64) -> u8 {
        (x.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    Rgb8::new(to_u8(r + m), to_u8(g + m), to_u8(b + m))
}

#[cfg(test)]
#[path = "../../tests/unit/config/color.rs"]
mod tests;
