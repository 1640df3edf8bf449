const UNITS: [&str; 7] = ["B", "KB", "MB", "GB", "TB", "PB", "EB"];
const BASE: u64 = 1024;

/// Formats a byte count with binary (1024) steps, e.g. `"1.50 KB"`.
///
/// Plain bytes carry no decimals. Anything past the largest unit is printed
/// as raw bytes.
pub fn human_readable_size(size: u64) -> String {
    let max_size = BASE.pow((UNITS.len() - 1) as u32);
    if size > max_size {
        return format!("{size} B");
    }

    let mut value = size as f64;
    let mut unit = 0;
    while value >= BASE as f64 && unit < UNITS.len() - 1 {
        value /= BASE as f64;
        unit += 1;
    }

    if unit == 0 {
        format!("{value:.0} {}", UNITS[unit])
    } else {
        format!("{value:.2} {}", UNITS[unit])
    }
}
