// Solotto Raffle Program - randomness oracle boundary
//
// The oracle collaborator is addressed purely at its interface: a request is
// announced through the program log, and the fulfillment later arrives as a
// FulfillRandomness instruction signed by the configured oracle authority.
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::msg;

/// Random words requested per settlement. Winner derivation only ever
/// consumes the first word.
pub const NUM_WORDS: u32 = 1;

/// Parameters forwarded verbatim to the oracle with each request. The
/// program stores and echoes them but never interprets them.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq)]
pub struct RequestParams {
    /// Identifies the oracle key lane the request should be served from
    pub key_hash: [u8; 32],
    /// Funding subscription the oracle bills the fulfillment against
    pub subscription_id: u64,
    /// Confirmations the oracle waits for before responding
    pub min_confirmations: u16,
    /// Compute budget the oracle grants the fulfillment call
    pub callback_compute_limit: u32,
}

impl RequestParams {
    pub const LEN: usize = 32 + 8 + 2 + 4;
}

/// Announce a new randomness request to the oracle network. Observers
/// correlate the later fulfillment with the settlement through `request_id`.
pub fn emit_randomness_request(params: &RequestParams, request_id: u64) {
    msg!(
        "Randomness requested: id={}, subscription={}, confirmations={}, compute_limit={}, words={}, key_hash={:?}",
        request_id,
        params.subscription_id,
        params.min_confirmations,
        params.callback_compute_limit,
        NUM_WORDS,
        params.key_hash,
    );
}

/// Reduce an oracle word to an entrant index.
///
/// The first 8 bytes are read as a little-endian u64 and taken modulo the
/// entrant count. The reduction keeps the slight modulo bias toward low
/// indexes.
pub fn winner_index(word: &[u8; 32], entrant_count: u64) -> u64 {
    if entrant_count == 0 {
        return 0;
    }

    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&word[..8]);
    u64::from_le_bytes(bytes) % entrant_count
}
