use anyhow::{Context, Result, bail};
use std::collections::HashSet;

/// Seed used when no tokens resolve.
pub const DEFAULT_SEED: u64 = 1337;

/// Widest `start..end` range accepted on the command line.
const MAX_RANGE_LEN: u64 = 10_000;

/// Resolve CLI seed tokens into a de-duplicated, ordered seed list.
///
/// Supports decimal integers (negative values use their magnitude), `0x` hex
/// literals, and half-open ranges written `start..end`.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seeds = Vec::new();
    let mut seen = HashSet::new();

    for token in tokens {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        for seed in parse_token(token)? {
            if seen.insert(seed) {
                seeds.push(seed);
            }
        }
    }

    if seeds.is_empty() {
        seeds.push(DEFAULT_SEED);
    }
    Ok(seeds)
}

fn parse_token(token: &str) -> Result<Vec<u64>> {
    if let Some((start, end)) = token.split_once("..") {
        let start = parse_single(start).with_context(|| format!("range start in {token}"))?;
        let end = parse_single(end).with_context(|| format!("range end in {token}"))?;
        if end <= start {
            bail!("Empty seed range: {token}");
        }
        if end - start > MAX_RANGE_LEN {
            bail!("Seed range {token} exceeds {MAX_RANGE_LEN} seeds");
        }
        return Ok((start..end).collect());
    }
    Ok(vec![parse_single(token)?])
}

fn parse_single(token: &str) -> Result<u64> {
    let token = token.trim();
    if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        return u64::from_str_radix(&hex.replace('_', ""), 16)
            .with_context(|| format!("Unrecognized hex seed: {token}"));
    }
    if let Ok(value) = token.parse::<i64>() {
        return Ok(value.unsigned_abs());
    }
    if let Ok(value) = token.parse::<u64>() {
        return Ok(value);
    }
    bail!("Unrecognized seed token: {token}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn parses_literals_hex_and_ranges() {
        let seeds = resolve_seed_inputs(&tokens(&["42", "0xFF", "-7", "3..6"])).unwrap();
        assert_eq!(seeds, vec![42, 255, 7, 3, 4, 5]);
    }

    #[test]
    fn dedupes_and_defaults() {
        let seeds = resolve_seed_inputs(&tokens(&["5", "5", "4..6"])).unwrap();
        assert_eq!(seeds, vec![5, 4]);
        assert_eq!(resolve_seed_inputs(&[]).unwrap(), vec![DEFAULT_SEED]);
    }

    #[test]
    fn rejects_garbage() {
        assert!(resolve_seed_inputs(&tokens(&["banana"])).is_err());
        assert!(resolve_seed_inputs(&tokens(&["9..3"])).is_err());
        assert!(resolve_seed_inputs(&tokens(&["0..99999"])).is_err());
        assert!(resolve_seed_inputs(&tokens(&["18446744073709551615"])).is_ok());
    }
}
