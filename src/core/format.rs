// src/core/format.rs
//
// Time formatting helpers.
//
// Two deliberately different rules coexist: axis tick labels are
// zero-padded "mm:ss" while the metadata duration is "m:s" with
// unpadded seconds. Both are observable output, so they stay separate
// functions rather than one shared formatter.

/// Axis tick label: zero-padded `mm:ss`. Minutes are not wrapped at 60.
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Metadata duration: `m:s`, seconds unpadded (e.g. "3:45", "3:5").
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}:{}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_zero_padded() {
        assert_eq!(format_timestamp(0.0), "00:00");
        assert_eq!(format_timestamp(185.0), "03:05");
        assert_eq!(format_timestamp(225.9), "03:45");
    }

    #[test]
    fn test_timestamp_minutes_not_wrapped() {
        assert_eq!(format_timestamp(3725.0), "62:05");
    }

    #[test]
    fn test_duration_unpadded_seconds() {
        assert_eq!(format_duration(185.0), "3:5");
        assert_eq!(format_duration(225.0), "3:45");
        assert_eq!(format_duration(0.0), "0:0");
    }

    #[test]
    fn test_rules_disagree_on_purpose() {
        // The same instant renders differently on the axis and in the
        // metadata line; neither side may be "fixed" to match the other.
        assert_ne!(format_timestamp(185.0), format_duration(185.0));
    }
}
