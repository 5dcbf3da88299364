// Solotto - an interval-settled raffle on Solana
//
// Entrants pay a fixed fee into a shared pool. Once the configured interval
// has elapsed with a non-empty pool, an automation caller triggers
// settlement: the round closes, a randomness request goes out to the oracle
// network, and the oracle's signed fulfillment picks the winner, pays out
// the entire pool and opens the next round.

pub mod error;
pub mod instruction;
pub mod oracle;
pub mod processor;
pub mod state;
pub mod utils;

#[cfg(not(feature = "no-entrypoint"))]
mod entrypoint;

use solana_program::{account_info::AccountInfo, entrypoint::ProgramResult, pubkey::Pubkey};

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    processor::Processor::process(program_id, accounts, instruction_data)
}
