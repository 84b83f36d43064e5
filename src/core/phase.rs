//! Phase ordering: `main` first, the rest by their first embedded number.

/// Name of the phase every project starts with.
pub const MAIN_PHASE: &str = "main";

/// Value of the first run of ASCII digits in `name`, or 0 when there is none.
pub fn phase_number(name: &str) -> u64 {
    name.chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .fold(0u64, |acc, c| {
            acc.saturating_mul(10)
                .saturating_add(u64::from(c as u8 - b'0'))
        })
}

/// Sorts phases in display order. Ties keep their input order.
pub fn sort_phases(phases: &mut [String]) {
    phases.sort_by_key(|p| (p != MAIN_PHASE, phase_number(p)));
}
