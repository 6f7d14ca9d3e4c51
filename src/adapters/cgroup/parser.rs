use crate::ports::Unavailable;

pub type ParseResult<T> = Result<T, Unavailable>;

/// v1 reports "no limit" as a page-aligned i64::MAX; anything this large is unbounded
pub const V1_UNLIMITED_THRESHOLD: u64 = 1 << 62;

/// Memory limit as written by the kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Bounded(u64),
    Unbounded,
}

/// Parse a single-value counter file such as `memory.current`
pub fn parse_counter(content: &str, name: &str) -> ParseResult<u64> {
    content
        .trim()
        .parse::<u64>()
        .map_err(|e| Unavailable::Parse(format!("{}: {}", name, e)))
}

/// Parse v2 `memory.max`
pub fn parse_v2_limit(content: &str) -> ParseResult<Limit> {
    let value = content.trim();
    if value == "max" {
        return Ok(Limit::Unbounded);
    }

    match parse_counter(value, "memory.max")? {
        0 => Ok(Limit::Unbounded),
        limit => Ok(Limit::Bounded(limit)),
    }
}

/// Parse v1 `memory.limit_in_bytes`
pub fn parse_v1_limit(content: &str) -> ParseResult<Limit> {
    match parse_counter(content, "memory.limit_in_bytes")? {
        0 => Ok(Limit::Unbounded),
        limit if limit >= V1_UNLIMITED_THRESHOLD => Ok(Limit::Unbounded),
        limit => Ok(Limit::Bounded(limit)),
    }
}

/// Extract `usage_usec` from v2 `cpu.stat`
pub fn parse_cpu_stat_usage(content: &str) -> ParseResult<u64> {
    for line in content.lines() {
        let mut parts = line.split_whitespace();
        if parts.next() == Some("usage_usec") {
            let value = parts
                .next()
                .ok_or_else(|| Unavailable::Parse("usage_usec has no value".to_string()))?;
            return parse_counter(value, "usage_usec");
        }
    }
    Err(Unavailable::MissingField("usage_usec".to_string()))
}

/// Extract `MemTotal` from /proc/meminfo, in bytes
pub fn parse_mem_total(content: &str) -> ParseResult<u64> {
    for line in content.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        if key.trim() == "MemTotal" {
            let kb = parse_counter(value.trim().trim_end_matches(" kB"), "MemTotal")?;
            return kb
                .checked_mul(1024)
                .ok_or_else(|| Unavailable::Parse(format!("MemTotal out of range: {} kB", kb)));
        }
    }
    Err(Unavailable::MissingField("MemTotal".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_counter() {
        assert_eq!(parse_counter("52428800\n", "memory.current").unwrap(), 52428800);
        assert!(parse_counter("-5", "memory.current").is_err());
        assert!(parse_counter("", "memory.current").is_err());
    }

    #[test]
    fn test_parse_v2_limit() {
        assert_eq!(parse_v2_limit("max\n").unwrap(), Limit::Unbounded);
        assert_eq!(parse_v2_limit("104857600\n").unwrap(), Limit::Bounded(104857600));
        assert_eq!(parse_v2_limit("0").unwrap(), Limit::Unbounded);
        assert!(parse_v2_limit("lots").is_err());
    }

    #[test]
    fn test_parse_v1_limit() {
        assert_eq!(parse_v1_limit("9223372036854771712\n").unwrap(), Limit::Unbounded);
        assert_eq!(parse_v1_limit("268435456\n").unwrap(), Limit::Bounded(268435456));
        assert_eq!(parse_v1_limit("0\n").unwrap(), Limit::Unbounded);
    }

    #[test]
    fn test_parse_cpu_stat_usage() {
        let content = "usage_usec 8123456\nuser_usec 6000000\nsystem_usec 2123456\nnr_periods 0\n";
        assert_eq!(parse_cpu_stat_usage(content).unwrap(), 8123456);

        let missing = parse_cpu_stat_usage("user_usec 1\n");
        assert!(matches!(missing, Err(Unavailable::MissingField(_))));
    }

    #[test]
    fn test_parse_mem_total() {
        let content = "MemTotal:       16318480 kB\nMemFree:         1234567 kB\n";
        assert_eq!(parse_mem_total(content).unwrap(), 16318480 * 1024);
        assert!(parse_mem_total("MemFree: 1 kB\n").is_err());

        let huge = format!("MemTotal: {} kB\n", u64::MAX);
        assert!(matches!(parse_mem_total(&huge), Err(Unavailable::Parse(_))));
    }
}
