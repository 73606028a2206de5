//! Seeded random streams for replayable careers.
use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use sha2::Sha256;
use std::cell::{RefCell, RefMut};

/// Deterministic pair of RNG streams for one matchday.
///
/// Streams are keyed on `(seed, season, matchday)`, so replaying a matchday
/// after a reload draws exactly the same numbers.
#[derive(Debug, Clone)]
pub struct RngBundle {
    player_match: RefCell<CountingRng<SmallRng>>,
    ai_match: RefCell<CountingRng<SmallRng>>,
}

impl RngBundle {
    #[must_use]
    pub fn for_matchday(seed: u64, season: u32, matchday: u32) -> Self {
        let player_tag = format!("player-match:{season}:{matchday}");
        let ai_tag = format!("ai-match:{season}:{matchday}");
        Self {
            player_match: RefCell::new(CountingRng::new(derive_stream_seed(
                seed,
                player_tag.as_bytes(),
            ))),
            ai_match: RefCell::new(CountingRng::new(derive_stream_seed(seed, ai_tag.as_bytes()))),
        }
    }

    /// Stream used for fixtures involving the player.
    #[must_use]
    pub fn player_match(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.player_match.borrow_mut()
    }

    /// Stream used for AI-vs-AI fixtures.
    #[must_use]
    pub fn ai_match(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.ai_match.borrow_mut()
    }

    /// Total draws across both streams.
    #[must_use]
    pub fn draws(&self) -> u64 {
        self.player_match
            .borrow()
            .draws()
            .saturating_add(self.ai_match.borrow().draws())
    }
}

/// Counting wrapper for RNG streams.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: rand::RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

/// HMAC-SHA256 of `domain_tag` keyed by the user seed, truncated to 64 bits.
#[must_use]
pub fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    // HMAC accepts keys of any length.
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0_u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}
