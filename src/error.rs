// Solotto Raffle Program - Errors
use solana_program::{
    decode_error::DecodeError,
    msg,
    program_error::{PrintProgramError, ProgramError},
};
use thiserror::Error;

/// Errors that may be returned by the raffle program
#[derive(Error, Debug, Copy, Clone, PartialEq)]
pub enum RaffleError {
    /// Invalid instruction data passed
    #[error("Invalid instruction data")]
    InvalidInstructionData,

    /// Raffle account has already been initialized
    #[error("Raffle already initialized")]
    AlreadyInitialized,

    /// Raffle account has not been initialized
    #[error("Raffle not initialized")]
    NotInitialized,

    /// Entrance fee, interval or capacity was zero at initialization
    #[error("Configuration value out of range")]
    InvalidConfiguration,

    /// Entry payment is below the entrance fee
    #[error("Payment is below the entrance fee")]
    InsufficientPayment,

    /// Entry attempted while a settlement is in flight
    #[error("Round is not open for entries")]
    NotOpen,

    /// Current round has no entrant slots left
    #[error("Round has reached its entrant capacity")]
    RoundFull,

    /// Settlement trigger fired while the round is not eligible
    #[error("Settlement conditions are not met")]
    UpkeepNotNeeded,

    /// Fulfillment carries an identifier that is not the outstanding one
    #[error("Fulfillment does not match the outstanding request")]
    UnknownRequest,

    /// Fulfillment was not signed by the configured oracle authority
    #[error("Fulfillment not signed by the oracle authority")]
    UnauthorizedCaller,

    /// Prize could not be credited to the derived winner
    #[error("Prize transfer failed")]
    PayoutFailed,

    /// Entrant accessor called with an index past the end of the list
    #[error("Entrant index out of range")]
    IndexOutOfRange,
}

impl From<RaffleError> for ProgramError {
    fn from(e: RaffleError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl<T> DecodeError<T> for RaffleError {
    fn type_of() -> &'static str {
        "Raffle Error"
    }
}

impl PrintProgramError for RaffleError {
    fn print<E>(&self) {
        msg!(&self.to_string());
    }
}
