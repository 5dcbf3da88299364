// Solotto Raffle Program - Instructions
use arrayref::array_ref;
use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
};
use std::mem::size_of;

use crate::{error::RaffleError, oracle::RequestParams};

#[derive(Clone, Debug, PartialEq)]
pub enum RaffleInstruction {
    /// Create and configure the raffle account. Configuration is immutable
    /// afterwards.
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The authority creating the raffle; pays rent
    /// 1. `[writable]` The raffle account (PDA, seeds `["raffle", authority]`)
    /// 2. `[]` The oracle authority allowed to deliver fulfillments
    /// 3. `[]` The system program
    Initialize {
        /// Minimum payment per entry in lamports
        entrance_fee: u64,
        /// Seconds between settlements
        interval: i64,
        /// Entrant capacity the account is sized for
        max_entrants: u32,
        /// Opaque oracle parameters, echoed with every request
        request_params: RequestParams,
    },

    /// Join the current round by paying at least the entrance fee.
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The entrant paying into the pool
    /// 1. `[writable]` The raffle account
    /// 2. `[]` The system program
    Enter {
        /// Payment in lamports, must be >= the entrance fee
        amount: u64,
    },

    /// Evaluate settlement eligibility without mutating anything. Meant to
    /// be simulated by the automation caller between rounds.
    ///
    /// Accounts expected:
    /// 0. `[]` The raffle account
    CheckUpkeep {},

    /// Start settlement: re-check eligibility, close the round and issue a
    /// randomness request. Any trailing instruction bytes are treated as an
    /// opaque trigger payload and ignored.
    ///
    /// Accounts expected:
    /// 0. `[signer]` Any caller (commonly the automation network)
    /// 1. `[writable]` The raffle account
    PerformUpkeep {},

    /// Deliver randomness for the outstanding request, pay the winner and
    /// reopen the round.
    ///
    /// Accounts expected:
    /// 0. `[signer]` The configured oracle authority
    /// 1. `[writable]` The raffle account
    /// 2. `[writable]` The winner account matching the derived entrant
    FulfillRandomness {
        /// Identifier of the request being fulfilled
        request_id: u64,
        /// Delivered random words; only the first is consumed
        random_words: Vec<[u8; 32]>,
    },
}

impl RaffleInstruction {
    /// Unpacks a byte buffer into a RaffleInstruction
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        let (tag, rest) = input
            .split_first()
            .ok_or(RaffleError::InvalidInstructionData)?;

        Ok(match tag {
            0 => {
                let (entrance_fee, rest) = Self::unpack_u64(rest)?;
                let (interval, rest) = Self::unpack_i64(rest)?;
                let (max_entrants, rest) = Self::unpack_u32(rest)?;
                let (key_hash, rest) = Self::unpack_bytes32(rest)?;
                let (subscription_id, rest) = Self::unpack_u64(rest)?;
                let (min_confirmations, rest) = Self::unpack_u16(rest)?;
                let (callback_compute_limit, _) = Self::unpack_u32(rest)?;
                Self::Initialize {
                    entrance_fee,
                    interval,
                    max_entrants,
                    request_params: RequestParams {
                        key_hash,
                        subscription_id,
                        min_confirmations,
                        callback_compute_limit,
                    },
                }
            }
            1 => {
                let (amount, _) = Self::unpack_u64(rest)?;
                Self::Enter { amount }
            }
            2 => Self::CheckUpkeep {},
            3 => Self::PerformUpkeep {},
            4 => {
                let (request_id, rest) = Self::unpack_u64(rest)?;
                let (word_count, mut rest) = Self::unpack_u32(rest)?;
                if word_count == 0 {
                    return Err(RaffleError::InvalidInstructionData.into());
                }
                let mut random_words = Vec::with_capacity(word_count as usize);
                for _ in 0..word_count {
                    let (word, remaining) = Self::unpack_bytes32(rest)?;
                    random_words.push(word);
                    rest = remaining;
                }
                Self::FulfillRandomness {
                    request_id,
                    random_words,
                }
            }
            _ => return Err(RaffleError::InvalidInstructionData.into()),
        })
    }

    /// Packs a RaffleInstruction into a byte buffer
    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(size_of::<Self>());
        match *self {
            Self::Initialize {
                entrance_fee,
                interval,
                max_entrants,
                ref request_params,
            } => {
                buf.push(0);
                buf.extend_from_slice(&entrance_fee.to_le_bytes());
                buf.extend_from_slice(&interval.to_le_bytes());
                buf.extend_from_slice(&max_entrants.to_le_bytes());
                buf.extend_from_slice(&request_params.key_hash);
                buf.extend_from_slice(&request_params.subscription_id.to_le_bytes());
                buf.extend_from_slice(&request_params.min_confirmations.to_le_bytes());
                buf.extend_from_slice(&request_params.callback_compute_limit.to_le_bytes());
            }
            Self::Enter { amount } => {
                buf.push(1);
                buf.extend_from_slice(&amount.to_le_bytes());
            }
            Self::CheckUpkeep {} => buf.push(2),
            Self::PerformUpkeep {} => buf.push(3),
            Self::FulfillRandomness {
                request_id,
                ref random_words,
            } => {
                buf.push(4);
                buf.extend_from_slice(&request_id.to_le_bytes());
                buf.extend_from_slice(&(random_words.len() as u32).to_le_bytes());
                for word in random_words {
                    buf.extend_from_slice(word);
                }
            }
        }
        buf
    }

    fn unpack_u64(input: &[u8]) -> Result<(u64, &[u8]), ProgramError> {
        if input.len() < 8 {
            return Err(RaffleError::InvalidInstructionData.into());
        }
        let (bytes, rest) = input.split_at(8);
        Ok((u64::from_le_bytes(*array_ref![bytes, 0, 8]), rest))
    }

    fn unpack_i64(input: &[u8]) -> Result<(i64, &[u8]), ProgramError> {
        if input.len() < 8 {
            return Err(RaffleError::InvalidInstructionData.into());
        }
        let (bytes, rest) = input.split_at(8);
        Ok((i64::from_le_bytes(*array_ref![bytes, 0, 8]), rest))
    }

    fn unpack_u32(input: &[u8]) -> Result<(u32, &[u8]), ProgramError> {
        if input.len() < 4 {
            return Err(RaffleError::InvalidInstructionData.into());
        }
        let (bytes, rest) = input.split_at(4);
        Ok((u32::from_le_bytes(*array_ref![bytes, 0, 4]), rest))
    }

    fn unpack_u16(input: &[u8]) -> Result<(u16, &[u8]), ProgramError> {
        if input.len() < 2 {
            return Err(RaffleError::InvalidInstructionData.into());
        }
        let (bytes, rest) = input.split_at(2);
        Ok((u16::from_le_bytes(*array_ref![bytes, 0, 2]), rest))
    }

    fn unpack_bytes32(input: &[u8]) -> Result<([u8; 32], &[u8]), ProgramError> {
        if input.len() < 32 {
            return Err(RaffleError::InvalidInstructionData.into());
        }
        let (bytes, rest) = input.split_at(32);
        Ok((*array_ref![bytes, 0, 32], rest))
    }
}

/// Create an initialize instruction
#[allow(clippy::too_many_arguments)]
pub fn initialize(
    program_id: &Pubkey,
    authority: &Pubkey,
    raffle_account: &Pubkey,
    oracle_authority: &Pubkey,
    entrance_fee: u64,
    interval: i64,
    max_entrants: u32,
    request_params: RequestParams,
) -> Result<Instruction, ProgramError> {
    let data = RaffleInstruction::Initialize {
        entrance_fee,
        interval,
        max_entrants,
        request_params,
    }
    .pack();

    let accounts = vec![
        AccountMeta::new(*authority, true),
        AccountMeta::new(*raffle_account, false),
        AccountMeta::new_readonly(*oracle_authority, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create an enter instruction
pub fn enter(
    program_id: &Pubkey,
    entrant: &Pubkey,
    raffle_account: &Pubkey,
    amount: u64,
) -> Result<Instruction, ProgramError> {
    let data = RaffleInstruction::Enter { amount }.pack();

    let accounts = vec![
        AccountMeta::new(*entrant, true),
        AccountMeta::new(*raffle_account, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create a check_upkeep instruction
pub fn check_upkeep(
    program_id: &Pubkey,
    raffle_account: &Pubkey,
) -> Result<Instruction, ProgramError> {
    let data = RaffleInstruction::CheckUpkeep {}.pack();

    let accounts = vec![AccountMeta::new_readonly(*raffle_account, false)];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create a perform_upkeep instruction
pub fn perform_upkeep(
    program_id: &Pubkey,
    caller: &Pubkey,
    raffle_account: &Pubkey,
) -> Result<Instruction, ProgramError> {
    let data = RaffleInstruction::PerformUpkeep {}.pack();

    let accounts = vec![
        AccountMeta::new_readonly(*caller, true),
        AccountMeta::new(*raffle_account, false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create a fulfill_randomness instruction
pub fn fulfill_randomness(
    program_id: &Pubkey,
    oracle_authority: &Pubkey,
    raffle_account: &Pubkey,
    winner: &Pubkey,
    request_id: u64,
    random_words: Vec<[u8; 32]>,
) -> Result<Instruction, ProgramError> {
    let data = RaffleInstruction::FulfillRandomness {
        request_id,
        random_words,
    }
    .pack();

    let accounts = vec![
        AccountMeta::new_readonly(*oracle_authority, true),
        AccountMeta::new(*raffle_account, false),
        AccountMeta::new(*winner, false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}
