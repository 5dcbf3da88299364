// Solotto Raffle Program - State
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    borsh::try_from_slice_unchecked,
    clock::UnixTimestamp,
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::{error::RaffleError, oracle::RequestParams};

/// Lifecycle of a raffle round
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq)]
pub enum RoundState {
    /// Accepting entries
    Open,
    /// Waiting for the randomness fulfillment of the outstanding request
    Calculating,
}

/// Raffle account data
///
/// A single program-owned account holds the whole raffle: the immutable
/// deployment configuration, the round flag, the entrant list and the one
/// outstanding randomness request. The prize pool is never tracked as a
/// counter; it is the account's own lamports above the rent floor, so
/// custody and accounting cannot drift apart.
#[derive(BorshSerialize, BorshDeserialize, Debug)]
pub struct Raffle {
    /// Is the account initialized
    pub is_initialized: bool,
    /// Bump seed of the raffle PDA
    pub bump: u8,
    /// Creator of the raffle (PDA seed; anyone may trigger settlement)
    pub authority: Pubkey,
    /// The only key allowed to deliver randomness fulfillments
    pub oracle_authority: Pubkey,
    /// Minimum payment to join a round, in lamports
    pub entrance_fee: u64,
    /// Seconds that must elapse between settlements
    pub interval: i64,
    /// Entrant capacity the account was sized for
    pub max_entrants: u32,
    /// Passthrough parameters for the randomness oracle
    pub request_params: RequestParams,
    /// Current round state
    pub state: RoundState,
    /// When the previous round settled (creation time for the first round)
    pub last_settled_at: UnixTimestamp,
    /// Source of unique request identifiers, increases on every request
    pub request_counter: u64,
    /// The single in-flight randomness request, if any
    pub pending_request: Option<u64>,
    /// Winner of the most recently settled round
    pub last_winner: Option<Pubkey>,
    /// Entrants of the current round, one slot per paid entry
    pub entrants: Vec<Pubkey>,
}

/// Account size excluding the entrant list:
/// 1 (is_initialized) + 1 (bump) + 32 (authority) + 32 (oracle_authority) +
/// 8 (entrance_fee) + 8 (interval) + 4 (max_entrants) + RequestParams::LEN +
/// 1 (state) + 8 (last_settled_at) + 8 (request_counter) +
/// 9 (pending_request: Option<u64>) + 33 (last_winner: Option<Pubkey>) +
/// 4 (entrants vec length)
const BASE_LEN: usize = 1 + 1 + 32 + 32 + 8 + 8 + 4 + RequestParams::LEN + 1 + 8 + 8 + 9 + 33 + 4;

impl Raffle {
    /// Create a freshly opened raffle
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        bump: u8,
        authority: Pubkey,
        oracle_authority: Pubkey,
        entrance_fee: u64,
        interval: i64,
        max_entrants: u32,
        request_params: RequestParams,
        now: UnixTimestamp,
    ) -> Self {
        Self {
            is_initialized: true,
            bump,
            authority,
            oracle_authority,
            entrance_fee,
            interval,
            max_entrants,
            request_params,
            state: RoundState::Open,
            last_settled_at: now,
            request_counter: 0,
            pending_request: None,
            last_winner: None,
            entrants: Vec::new(),
        }
    }

    /// Bytes to allocate for a raffle sized for `max_entrants`
    pub fn space(max_entrants: u32) -> usize {
        BASE_LEN + 32 * max_entrants as usize
    }

    /// Deserialize a raffle from raw account data. The entrant list is
    /// shorter than the allocated capacity, so the trailing padding must be
    /// ignored rather than treated as a length mismatch.
    pub fn try_from_account_data(data: &[u8]) -> Result<Self, ProgramError> {
        Ok(try_from_slice_unchecked::<Raffle>(data)?)
    }

    /// The settlement eligibility predicate.
    ///
    /// True iff the round is open, the interval has elapsed since the last
    /// settlement, at least one entrant joined and the pool holds lamports.
    /// Both the read-only query and the settlement trigger go through this
    /// one function, so they can never disagree. The second value is
    /// reserved payload space for the automation caller, empty today.
    pub fn check_upkeep(&self, now: UnixTimestamp, pool_lamports: u64) -> (bool, Vec<u8>) {
        let ready = self.state == RoundState::Open
            && now.saturating_sub(self.last_settled_at) >= self.interval
            && !self.entrants.is_empty()
            && pool_lamports > 0;
        (ready, Vec::new())
    }

    /// Number of entries in the current round
    pub fn entrant_count(&self) -> u64 {
        self.entrants.len() as u64
    }

    /// Entrant at `index`, counted in entry order
    pub fn entrant_at(&self, index: u64) -> Result<Pubkey, RaffleError> {
        self.entrants
            .get(index as usize)
            .copied()
            .ok_or(RaffleError::IndexOutOfRange)
    }
}
