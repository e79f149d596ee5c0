//! Number formatting for `Disp` output and the variables pane

/// Format a number the way the calculator host prints it.
///
/// Integers have no decimal point, fractions use the shortest decimal that
/// round-trips, and magnitudes outside `1e-6..1e21` switch to exponent form
/// (`1e+21`, `2.5e-7`). Negative zero prints as `0`.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{}", n);
    }

    let exp = format!("{:e}", n);
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
        _ => exp,
    }
}
