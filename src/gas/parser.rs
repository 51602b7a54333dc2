//! Trimix notation parsing.

use crate::error::{GasError, Result};

use super::models::GasMix;

/// Parse trimix notation into a mix.
///
/// `"18/35"` is 18% oxygen and 35% helium; a bare number such as `"50"` is a
/// nitrox mix with no helium. Nitrogen makes up the balance.
pub fn parse_trimix(trimix: &str) -> Result<GasMix> {
    let trimix = trimix.trim();

    let (o2, he) = if trimix.contains('/') {
        let tokens: Vec<&str> = trimix.split('/').collect();
        if tokens.len() != 2 {
            return Err(parse_error(
                trimix,
                format!("expected O2/He, found {} parts", tokens.len()),
            ));
        }
        (
            parse_percent(trimix, tokens[0])?,
            parse_percent(trimix, tokens[1])?,
        )
    } else {
        (parse_percent(trimix, trimix)?, 0)
    };

    GasMix::new(o2, he)
}

fn parse_percent(input: &str, token: &str) -> Result<i32> {
    let token = token.trim();
    token
        .parse::<i32>()
        .map_err(|_| parse_error(input, format!("'{token}' is not an integer")))
}

fn parse_error(input: &str, reason: String) -> GasError {
    GasError::Parse {
        input: input.to_string(),
        reason,
    }
}
