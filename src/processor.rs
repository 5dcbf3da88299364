// Solotto Raffle Program - Instruction Processor
use borsh::BorshSerialize;
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::{invoke, invoke_signed},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_instruction,
    sysvar::{clock::Clock, rent::Rent, Sysvar},
};

use crate::{
    error::RaffleError,
    instruction::RaffleInstruction,
    oracle::{self, RequestParams},
    state::{Raffle, RoundState},
    utils,
};

/// Program state handler
pub struct Processor;

impl Processor {
    pub fn process(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instruction_data: &[u8],
    ) -> ProgramResult {
        let instruction = RaffleInstruction::unpack(instruction_data)?;

        match instruction {
            RaffleInstruction::Initialize {
                entrance_fee,
                interval,
                max_entrants,
                request_params,
            } => {
                msg!("Instruction: Initialize");
                Self::process_initialize(
                    accounts,
                    entrance_fee,
                    interval,
                    max_entrants,
                    request_params,
                    program_id,
                )
            }
            RaffleInstruction::Enter { amount } => {
                msg!("Instruction: Enter");
                Self::process_enter(accounts, amount, program_id)
            }
            RaffleInstruction::CheckUpkeep {} => {
                msg!("Instruction: Check Upkeep");
                Self::process_check_upkeep(accounts, program_id)
            }
            RaffleInstruction::PerformUpkeep {} => {
                msg!("Instruction: Perform Upkeep");
                Self::process_perform_upkeep(accounts, program_id)
            }
            RaffleInstruction::FulfillRandomness {
                request_id,
                random_words,
            } => {
                msg!("Instruction: Fulfill Randomness");
                Self::process_fulfill_randomness(accounts, request_id, &random_words, program_id)
            }
        }
    }

    /// Process the Initialize instruction
    ///
    /// Creates the raffle account and writes its immutable configuration.
    /// Called once per deployment; everything after this goes through the
    /// round lifecycle.
    fn process_initialize(
        accounts: &[AccountInfo],
        entrance_fee: u64,
        interval: i64,
        max_entrants: u32,
        request_params: RequestParams,
        program_id: &Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let authority_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let oracle_authority_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        // Verify the authority signed the transaction
        if !authority_info.is_signer {
            msg!("Authority must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        if entrance_fee == 0 || interval <= 0 || max_entrants == 0 {
            msg!("Entrance fee, interval and capacity must all be positive");
            return Err(RaffleError::InvalidConfiguration.into());
        }

        // Verify the provided raffle account is the expected PDA
        let (expected_raffle_pubkey, bump_seed) =
            utils::find_raffle_address(program_id, authority_info.key);
        if *raffle_info.key != expected_raffle_pubkey {
            msg!("Invalid raffle account address");
            return Err(ProgramError::InvalidArgument);
        }

        // Create the account if it does not exist yet, sized for the full
        // entrant capacity up front
        if raffle_info.owner != program_id {
            let space = Raffle::space(max_entrants);
            let rent = Rent::get()?;
            let rent_lamports = rent.minimum_balance(space);

            invoke_signed(
                &system_instruction::create_account(
                    authority_info.key,
                    raffle_info.key,
                    rent_lamports,
                    space as u64,
                    program_id,
                ),
                &[
                    authority_info.clone(),
                    raffle_info.clone(),
                    system_program_info.clone(),
                ],
                &[&[b"raffle", authority_info.key.as_ref(), &[bump_seed]]],
            )?;
        }

        let existing = Raffle::try_from_account_data(&raffle_info.data.borrow())?;
        if existing.is_initialized {
            msg!("Raffle account is already initialized");
            return Err(RaffleError::AlreadyInitialized.into());
        }

        let clock = Clock::get()?;
        let raffle = Raffle::new(
            bump_seed,
            *authority_info.key,
            *oracle_authority_info.key,
            entrance_fee,
            interval,
            max_entrants,
            request_params,
            clock.unix_timestamp,
        );
        raffle.serialize(&mut *raffle_info.data.borrow_mut())?;

        msg!(
            "Raffle initialized: fee={} lamports, interval={}s, capacity={}, oracle={}",
            entrance_fee,
            interval,
            max_entrants,
            oracle_authority_info.key
        );
        Ok(())
    }

    /// Process the Enter instruction
    fn process_enter(accounts: &[AccountInfo], amount: u64, program_id: &Pubkey) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let entrant_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        // The entrant pays, so they must sign
        if !entrant_info.is_signer {
            msg!("Entrant must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        if raffle_info.owner != program_id {
            msg!("Raffle account must be owned by this program");
            return Err(ProgramError::IncorrectProgramId);
        }

        let mut raffle = Raffle::try_from_account_data(&raffle_info.data.borrow())?;
        if !raffle.is_initialized {
            return Err(RaffleError::NotInitialized.into());
        }

        if amount < raffle.entrance_fee {
            msg!(
                "Entry of {} lamports is below the {} lamport entrance fee",
                amount,
                raffle.entrance_fee
            );
            return Err(RaffleError::InsufficientPayment.into());
        }

        if raffle.state != RoundState::Open {
            msg!("Entries are closed while a settlement is in flight");
            return Err(RaffleError::NotOpen.into());
        }

        if raffle.entrants.len() >= raffle.max_entrants as usize {
            msg!("Round is full: {} entrants", raffle.entrants.len());
            return Err(RaffleError::RoundFull.into());
        }

        // Move the payment into custody before recording the entry
        invoke(
            &system_instruction::transfer(entrant_info.key, raffle_info.key, amount),
            &[
                entrant_info.clone(),
                raffle_info.clone(),
                system_program_info.clone(),
            ],
        )?;

        raffle.entrants.push(*entrant_info.key);
        raffle.serialize(&mut *raffle_info.data.borrow_mut())?;

        msg!("Entered raffle: {}", entrant_info.key);
        Ok(())
    }

    /// Process the CheckUpkeep instruction
    ///
    /// Read-only: evaluates the same predicate PerformUpkeep re-checks and
    /// logs the verdict for the automation caller to pick out of a
    /// simulation.
    fn process_check_upkeep(accounts: &[AccountInfo], program_id: &Pubkey) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let raffle_info = next_account_info(account_info_iter)?;

        if raffle_info.owner != program_id {
            msg!("Raffle account must be owned by this program");
            return Err(ProgramError::IncorrectProgramId);
        }

        let raffle = Raffle::try_from_account_data(&raffle_info.data.borrow())?;
        if !raffle.is_initialized {
            return Err(RaffleError::NotInitialized.into());
        }

        let clock = Clock::get()?;
        let rent = Rent::get()?;
        let pool = utils::pool_balance(raffle_info.lamports(), &rent, raffle_info.data_len());
        let (needed, _payload) = raffle.check_upkeep(clock.unix_timestamp, pool);

        msg!(
            "Upkeep needed: {} (balance={}, entrants={}, state={:?})",
            needed,
            pool,
            raffle.entrants.len(),
            raffle.state
        );
        Ok(())
    }

    /// Process the PerformUpkeep instruction - phase 1 of settlement
    ///
    /// Closes the round and issues the randomness request whose identifier
    /// gates the later fulfillment.
    fn process_perform_upkeep(accounts: &[AccountInfo], program_id: &Pubkey) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let caller_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;

        // Anyone may trigger settlement, but they must sign
        if !caller_info.is_signer {
            msg!("Caller must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        if raffle_info.owner != program_id {
            msg!("Raffle account must be owned by this program");
            return Err(ProgramError::IncorrectProgramId);
        }

        let mut raffle = Raffle::try_from_account_data(&raffle_info.data.borrow())?;
        if !raffle.is_initialized {
            return Err(RaffleError::NotInitialized.into());
        }

        let clock = Clock::get()?;
        let rent = Rent::get()?;
        let pool = utils::pool_balance(raffle_info.lamports(), &rent, raffle_info.data_len());
        let (needed, _payload) = raffle.check_upkeep(clock.unix_timestamp, pool);
        if !needed {
            msg!(
                "Upkeep not needed: balance={}, entrants={}, state={:?}",
                pool,
                raffle.entrants.len(),
                raffle.state
            );
            return Err(RaffleError::UpkeepNotNeeded.into());
        }

        // Close the round, then issue the request. Requiring Open here and
        // blocking entries while Calculating is what keeps a second request
        // from ever being outstanding.
        raffle.state = RoundState::Calculating;
        raffle.request_counter = raffle
            .request_counter
            .checked_add(1)
            .ok_or(ProgramError::InvalidArgument)?;
        let request_id = raffle.request_counter;

        oracle::emit_randomness_request(&raffle.request_params, request_id);

        raffle.pending_request = Some(request_id);
        raffle.serialize(&mut *raffle_info.data.borrow_mut())?;

        msg!("Settlement requested: request_id={}", request_id);
        Ok(())
    }

    /// Process the FulfillRandomness instruction - phase 2 of settlement
    ///
    /// Only the configured oracle authority may call this, and only for the
    /// identifier stored by phase 1. Pays the winner, resets the pool and
    /// reopens the round.
    fn process_fulfill_randomness(
        accounts: &[AccountInfo],
        request_id: u64,
        random_words: &[[u8; 32]],
        program_id: &Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let oracle_authority_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let winner_info = next_account_info(account_info_iter)?;

        if raffle_info.owner != program_id {
            msg!("Raffle account must be owned by this program");
            return Err(ProgramError::IncorrectProgramId);
        }

        let mut raffle = Raffle::try_from_account_data(&raffle_info.data.borrow())?;
        if !raffle.is_initialized {
            return Err(RaffleError::NotInitialized.into());
        }

        // Access gate: the oracle signature is checked before anything about
        // the request itself
        if !oracle_authority_info.is_signer || *oracle_authority_info.key != raffle.oracle_authority
        {
            msg!("Fulfillment rejected: caller is not the oracle authority");
            return Err(RaffleError::UnauthorizedCaller.into());
        }

        // The stored identifier is the only link between request and
        // fulfillment; anything else is forged or stale
        if raffle.pending_request != Some(request_id) {
            msg!("Fulfillment rejected: request {} is not outstanding", request_id);
            return Err(RaffleError::UnknownRequest.into());
        }

        let word = random_words
            .first()
            .ok_or(RaffleError::InvalidInstructionData)?;
        let index = oracle::winner_index(word, raffle.entrant_count());
        let winner = raffle.entrant_at(index)?;
        msg!("Winner index: {}", index);

        if *winner_info.key != winner {
            msg!(
                "Payout failed: derived winner {}, got account {}",
                winner,
                winner_info.key
            );
            return Err(RaffleError::PayoutFailed.into());
        }

        // Pay out the entire pool, leaving only the rent floor in custody
        let rent = Rent::get()?;
        let prize = utils::pool_balance(raffle_info.lamports(), &rent, raffle_info.data_len());

        let raffle_lamports = raffle_info
            .lamports()
            .checked_sub(prize)
            .ok_or(RaffleError::PayoutFailed)?;
        let winner_lamports = winner_info
            .lamports()
            .checked_add(prize)
            .ok_or(RaffleError::PayoutFailed)?;
        **raffle_info.try_borrow_mut_lamports()? = raffle_lamports;
        **winner_info.try_borrow_mut_lamports()? = winner_lamports;

        // Reset only after the transfer is in place
        let clock = Clock::get()?;
        raffle.entrants.clear();
        raffle.pending_request = None;
        raffle.last_winner = Some(winner);
        raffle.last_settled_at = clock.unix_timestamp;
        raffle.state = RoundState::Open;
        raffle.serialize(&mut *raffle_info.data.borrow_mut())?;

        msg!("Winner picked: {} wins {} lamports", winner, prize);
        Ok(())
    }
}
