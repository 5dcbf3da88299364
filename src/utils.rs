// Solotto Raffle Program - Utility Functions
use solana_program::{pubkey::Pubkey, rent::Rent};

/// Find the program derived address for the raffle created by `authority`
pub fn find_raffle_address(program_id: &Pubkey, authority: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[b"raffle", authority.as_ref()], program_id)
}

/// Lamports held above the rent-exempt floor.
///
/// This is the prize pool: the raffle account itself is the custody of all
/// entrance payments, so the pool is derived from the balance rather than
/// tracked in a counter that could drift from it.
pub fn pool_balance(lamports: u64, rent: &Rent, data_len: usize) -> u64 {
    lamports.saturating_sub(rent.minimum_balance(data_len))
}
