//! Colour resolution for CSS-style colour strings.

use palette::{FromColor, Hsl, Srgb, Srgba, WithAlpha};

/// Resolves `spec` to its RGB channels, or `None` if it is not a colour this
/// module understands. Any alpha carried by the input is ignored.
pub fn resolve(spec: &str) -> Option<Srgb<f64>> {
    resolve_rgba(spec).map(|c| c.color)
}

/// Resolves `spec` including the alpha it carries, opaque when it has none.
///
/// Accepts CSS named colours, `transparent`, `#rgb`/`#rgba`/`#rrggbb`/
/// `#rrggbbaa`, `rgb()`/`rgba()` and `hsl()`/`hsla()`.
pub fn resolve_rgba(spec: &str) -> Option<Srgba<f64>> {
    let spec = spec.trim().to_ascii_lowercase();

    if let Some(hex) = spec.strip_prefix('#') {
        return parse_hex(hex);
    }
    if spec == "transparent" {
        return Some(Srgba::new(0.0, 0.0, 0.0, 0.0));
    }
    if let Some((func, args)) = split_function(&spec) {
        return match func {
            "rgb" | "rgba" => parse_rgb_args(&args),
            "hsl" | "hsla" => parse_hsl_args(&args),
            _ => None,
        };
    }

    palette::named::from_str(&spec).map(|c| {
        let rgb: Srgb<f64> = c.into_format();
        rgb.with_alpha(1.0)
    })
}

/// Re-expresses `spec` with the given alpha, falling back to black when the
/// colour cannot be resolved.
pub fn color_with_alpha(spec: &str, alpha: f64) -> Srgba<f64> {
    let rgb = resolve(spec).unwrap_or_else(|| {
        log::debug!("unresolvable colour '{}', using black", spec);
        Srgb::new(0.0, 0.0, 0.0)
    });
    Srgba::new(rgb.red, rgb.green, rgb.blue, alpha.clamp(0.0, 1.0))
}

/// `spec` as written, alpha included, or opaque black when it cannot be
/// resolved.
pub fn color_or_black(spec: &str) -> Srgba<f64> {
    resolve_rgba(spec).unwrap_or_else(|| {
        log::debug!("unresolvable colour '{}', using black", spec);
        Srgba::new(0.0, 0.0, 0.0, 1.0)
    })
}

fn parse_hex(hex: &str) -> Option<Srgba<f64>> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let (rgb, alpha) = match hex.len() {
        3 | 6 => (hex, None),
        4 => (&hex[..3], Some(hex[3..].repeat(2))),
        8 => (&hex[..6], Some(hex[6..].to_string())),
        _ => return None,
    };
    let alpha = match alpha {
        Some(a) => f64::from(u8::from_str_radix(&a, 16).ok()?) / 255.0,
        None => 1.0,
    };
    let rgb: Srgb<f64> = rgb.parse::<Srgb<u8>>().ok()?.into_format();
    Some(rgb.with_alpha(alpha))
}

fn split_function(spec: &str) -> Option<(&str, Vec<&str>)> {
    let (name, rest) = spec.split_once('(')?;
    let body = rest.strip_suffix(')')?;
    let args = body
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();
    Some((name.trim(), args))
}

/// Optional fourth argument: a fraction or a percentage.
fn parse_alpha(args: &[&str]) -> Option<f64> {
    let Some(s) = args.get(3) else {
        return Some(1.0);
    };
    let v = match s.strip_suffix('%') {
        Some(pct) => pct.parse::<f64>().ok()? / 100.0,
        None => s.parse::<f64>().ok()?,
    };
    Some(v.clamp(0.0, 1.0))
}

fn parse_rgb_args(args: &[&str]) -> Option<Srgba<f64>> {
    if !(3..=4).contains(&args.len()) {
        return None;
    }
    let channel = |s: &str| -> Option<f64> {
        let v = match s.strip_suffix('%') {
            Some(pct) => pct.parse::<f64>().ok()? / 100.0,
            None => s.parse::<f64>().ok()? / 255.0,
        };
        Some(v.clamp(0.0, 1.0))
    };
    Some(Srgba::new(
        channel(args[0])?,
        channel(args[1])?,
        channel(args[2])?,
        parse_alpha(args)?,
    ))
}

fn parse_hsl_args(args: &[&str]) -> Option<Srgba<f64>> {
    if !(3..=4).contains(&args.len()) {
        return None;
    }
    let hue = args[0].strip_suffix("deg").unwrap_or(args[0]);
    let hue = hue.parse::<f64>().ok()?;
    let percent = |s: &str| -> Option<f64> {
        let v = s.strip_suffix('%').unwrap_or(s).parse::<f64>().ok()?;
        Some((v / 100.0).clamp(0.0, 1.0))
    };
    let hsl: Hsl<palette::encoding::Srgb, f64> =
        Hsl::new(hue, percent(args[1])?, percent(args[2])?);
    Some(Srgb::from_color(hsl).with_alpha(parse_alpha(args)?))
}
