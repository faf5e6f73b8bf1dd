/// Checks whether a string is an acceptable IPv4 DNS server address.
///
/// Four dotted decimal octets; the last three must be in 0-255. The first
/// octet is restricted to 1-233, which also rejects 0.x and the 234-255
/// block. That range is narrower than standard IPv4 and is kept on purpose
/// for parity with existing behavior; DESIGN.md flags it for review.
pub fn validate_dns_address(address: &str) -> bool {
    let parts: Vec<&str> = address.split('.').collect();
    if parts.len() != 4 {
        return false;
    }

    let Ok(first) = parts[0].trim().parse::<u32>() else {
        return false;
    };
    if !(1..=233).contains(&first) {
        return false;
    }

    parts[1..]
        .iter()
        .all(|part| matches!(part.trim().parse::<u32>(), Ok(n) if n <= 255))
}
