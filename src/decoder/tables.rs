//! CPU and OS label tables.
//!
//! The client reported its platform as a type/species code pair. Labels are
//! keyed on `(type * 100000) + species`, the same composite the legacy
//! tooling used. Codes the table does not know map to "Unknown".

pub fn cpu_label(cpu_type: u32, cpu_species: u32) -> &'static str {
    match cpu_type.wrapping_mul(100_000).wrapping_add(cpu_species) {
        100_000 | 100_085 => "x86",
        100_086 => "i86",
        100_087 => "Pentium IV",
        100_186 => "i186",
        100_286 => "i286",
        100_386 => "i386",
        100_486 => "i486",
        100_586 => "Pentium",
        100_587 => "Pentium MMX",
        100_686 => "Pentium Pro",
        100_687 => "Pentium II/III",
        101_000 => "Cyrix x86",
        102_000 => "AMD x86",
        200_000 => "PowerPC",
        1_100_000 => "IA64",
        1_600_000 => "AMD64",
        _ => "Unknown",
    }
}

pub fn os_label(os_type: u32, os_species: u32) -> &'static str {
    match os_type.wrapping_mul(100_000).wrapping_add(os_species) {
        100_000 => "Windows",
        100_001 => "Win95",
        100_002 => "Win95_OSR2",
        100_003 => "Win98",
        100_004 => "Win98SE",
        100_005 => "WinME",
        100_006 => "WinNT",
        100_007 => "Win2K",
        100_008 => "WinXP",
        100_009 => "Win2K3",
        200_000 => "MacOS",
        300_000 => "OSX",
        400_000 => "Linux",
        700_000 => "FreeBSD",
        800_000 => "OpenBSD",
        1_800_000 => "Win64",
        1_900_000 => "OS2",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_label_known_codes() {
        assert_eq!(cpu_label(16, 0), "AMD64");
        assert_eq!(cpu_label(1, 0), "x86");
        assert_eq!(cpu_label(1, 85), "x86");
        assert_eq!(cpu_label(1, 687), "Pentium II/III");
        assert_eq!(cpu_label(2, 0), "PowerPC");
    }

    #[test]
    fn test_cpu_label_unknown_code() {
        assert_eq!(cpu_label(0, 0), "Unknown");
        assert_eq!(cpu_label(17, 42), "Unknown");
    }

    #[test]
    fn test_os_label_known_codes() {
        assert_eq!(os_label(1, 8), "WinXP");
        assert_eq!(os_label(1, 9), "Win2K3");
        assert_eq!(os_label(4, 0), "Linux");
        assert_eq!(os_label(18, 0), "Win64");
    }

    #[test]
    fn test_os_label_unknown_code() {
        assert_eq!(os_label(0, 0), "Unknown");
        assert_eq!(os_label(5, 0), "Unknown");
        assert_eq!(os_label(4, 1), "Unknown");
    }
}
