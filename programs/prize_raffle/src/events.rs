use anchor_lang::prelude::*;

#[event]
#[derive(Debug)]
pub struct Entered {
    pub round_id: u64,
    pub player: Pubkey,
    pub entries: u64,
}

#[event]
pub struct RandomnessRequested {
    pub request_id: [u8; 32],
    pub round_id: u64,
    pub key_hash: [u8; 32],
    pub request_confirmations: u16,
    pub num_words: u32,
    pub callback_compute_units: u32,
}

#[event]
#[derive(Debug)]
pub struct WinnerPicked {
    pub round_id: u64,
    pub winner: Pubkey,
    pub prize: u64,
    pub fee: u64,
}

#[event]
pub struct PrizeSent {
    pub recipient: Pubkey,
    pub amount: u64,
}

#[event]
pub struct FeeWithdrawn {
    pub owner: Pubkey,
    pub amount: u64,
}

#[event]
pub struct DelegatedWithdrawEnabled {
    pub enabled: bool,
}

#[event]
pub struct OwnershipTransferStarted {
    pub previous_owner: Pubkey,
    pub new_owner: Pubkey,
}

#[event]
pub struct OwnershipTransferred {
    pub previous_owner: Pubkey,
    pub new_owner: Pubkey,
}
