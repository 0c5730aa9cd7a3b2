use framebridge_protocol::EmbedId;
use rand::Rng;
use ulid::Ulid;
use web_time::{SystemTime, UNIX_EPOCH};

use crate::GeneratorError;

/// A source of embed id tokens.
///
/// Ids only need to be unique among the embeds of one page, so they are a
/// convenience rather than a secret. A source that cannot produce a token
/// returns `None` and [`embed_id`] falls back to [`ClockIdSource`].
pub trait IdSource {
    /// A fresh token, or `None` when the source is unavailable.
    fn token(&self) -> Option<String>;
}

/// ULIDs whose random part comes from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecureIdSource;

impl IdSource for SecureIdSource {
    fn token(&self) -> Option<String> {
        let mut random = [0u8; 16];
        if let Err(error) = getrandom::getrandom(&mut random[6..]) {
            tracing::warn!(%error, "Secure random source unavailable");
            return None;
        }

        Some(Ulid::from_parts(now_millis(), u128::from_be_bytes(random)).to_string())
    }
}

/// Base-36 milliseconds and eight base-36 characters from a
/// non-cryptographic generator. Always available.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClockIdSource;

impl ClockIdSource {
    fn clock_token(&self) -> String {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..8)
            .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
            .collect();

        format!("{}_{suffix}", base36(now_millis()))
    }
}

impl IdSource for ClockIdSource {
    fn token(&self) -> Option<String> {
        Some(self.clock_token())
    }
}

/// A fresh embed id from `source`, or from the clock when `source` has
/// nothing to offer.
pub fn embed_id(source: &dyn IdSource) -> Result<EmbedId, GeneratorError> {
    let token = source.token().unwrap_or_else(|| ClockIdSource.clock_token());
    Ok(EmbedId::from_token(&token)?)
}

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn base36(mut value: u64) -> String {
    let mut digits = Vec::new();
    loop {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
        if value == 0 {
            break;
        }
    }
    digits.iter().rev().map(|digit| char::from(*digit)).collect()
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}
