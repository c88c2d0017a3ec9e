use anchor_lang::prelude::*;

use crate::{
    constants::*,
    errors::RaffleError,
    utils::{pick_winner_index, split_protocol_fee, winning_ticket},
};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug, InitSpace)]
pub enum RaffleState {
    Open,
    Calculating,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug, InitSpace)]
pub struct Participant {
    pub player: Pubkey,
    pub entries: u64,
}

/// Parameters forwarded to the randomness coordinator with every request.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug, InitSpace)]
pub struct RandomnessParams {
    pub key_hash: [u8; 32],
    pub request_confirmations: u16,
    pub num_words: u32,
    pub callback_compute_units: u32,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug, InitSpace)]
pub struct PendingRequest {
    pub request_id: [u8; 32],
    pub round_id: u64,
    pub requested_slot: u64,
}

#[account]
#[derive(InitSpace)]
pub struct Raffle {
    pub owner: Pubkey,
    /// Pubkey::default() when no transfer is in progress.
    pub pending_owner: Pubkey,
    pub bump: u8,

    // System-owned PDA vault (holds lamports, no data)
    pub vault: Pubkey,
    pub vault_bump: u8,

    pub price_feed: Pubkey,
    pub randomness_coordinator: Pubkey,
    pub randomness_params: RandomnessParams,

    /// Reference-currency units at REFERENCE_DECIMALS.
    pub min_entrance_fee: u64,
    /// Seconds a round stays open before upkeep may close it.
    pub interval: i64,

    pub state: RaffleState,
    pub round_id: u64,
    pub round_started_at: i64,

    #[max_len(50)]
    pub participants: Vec<Participant>,
    pub round_entries: u64,
    pub round_value: u64,

    pub total_value_held: u64,
    pub total_fee_collected: u64,
    pub recent_winner: Pubkey,

    pub pending_request: Option<PendingRequest>,
    pub request_nonce: u64,

    pub delegated_withdraw_enabled: bool,
    pub locked: bool,

    pub version: u16,
}

#[account]
#[derive(InitSpace)]
pub struct PlayerLedger {
    pub raffle: Pubkey,
    pub player: Pubkey,
    pub bump: u8,

    /// Unclaimed prizes, summed across rounds.
    pub prize_owed: u64,
    pub last_round_entered: u64,
    pub rounds_won: u64,
}

/// Outcome of a settled round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub round_id: u64,
    pub winner: Pubkey,
    pub prize: u64,
    pub fee: u64,
}

impl Raffle {
    pub fn is_open(&self) -> bool {
        self.state == RaffleState::Open
    }

    pub fn entries_of(&self, player: &Pubkey) -> u64 {
        self.participants
            .iter()
            .find(|p| p.player == *player)
            .map_or(0, |p| p.entries)
    }

    pub fn has_entered(&self, player: &Pubkey) -> bool {
        self.participants.iter().any(|p| p.player == *player)
    }

    pub fn ensure_can_enter(&self, player: &Pubkey) -> Result<()> {
        require!(self.is_open(), RaffleError::NotOpen);
        require!(self.participants.len() < MAX_PLAYERS, RaffleError::RaffleFull);
        require!(!self.has_entered(player), RaffleError::AlreadyEntered);
        Ok(())
    }

    /// Adds `player` to the current round. Returns the value taken into custody.
    pub fn record_entry(&mut self, player: Pubkey, entries: u64, unit_amount: u64) -> Result<u64> {
        self.ensure_can_enter(&player)?;
        require!(entries > 0, RaffleError::InsufficientEntryAmount);
        require!(entries <= MAX_ENTRIES_PER_PLAYER, RaffleError::TooManyEntries);

        let value = entries
            .checked_mul(unit_amount)
            .ok_or_else(|| error!(RaffleError::MathOverflow))?;
        let round_entries = self
            .round_entries
            .checked_add(entries)
            .ok_or_else(|| error!(RaffleError::MathOverflow))?;
        let round_value = self
            .round_value
            .checked_add(value)
            .ok_or_else(|| error!(RaffleError::MathOverflow))?;
        let total_value_held = self
            .total_value_held
            .checked_add(value)
            .ok_or_else(|| error!(RaffleError::MathOverflow))?;

        self.participants.push(Participant { player, entries });
        self.round_entries = round_entries;
        self.round_value = round_value;
        self.total_value_held = total_value_held;

        Ok(value)
    }

    /// Upkeep predicate. `balance` is the vault balance above its rent reserve.
    pub fn upkeep_needed(&self, now: i64, balance: u64) -> bool {
        let elapsed = now.saturating_sub(self.round_started_at);
        elapsed > self.interval
            && self.is_open()
            && !self.participants.is_empty()
            && balance > 0
    }

    /// Closes the round for drawing. Fails with `UpkeepNotNeeded`, leaving the
    /// raffle untouched, unless `upkeep_needed(now, balance)` holds.
    pub fn begin_calculating(
        &mut self,
        now: i64,
        balance: u64,
        request_id: [u8; 32],
        current_slot: u64,
    ) -> Result<()> {
        if !self.upkeep_needed(now, balance) || self.pending_request.is_some() {
            msg!(
                "Upkeep not needed: balance {} players {} state {:?}",
                balance,
                self.participants.len(),
                self.state
            );
            return err!(RaffleError::UpkeepNotNeeded);
        }

        self.request_nonce = self
            .request_nonce
            .checked_add(1)
            .ok_or_else(|| error!(RaffleError::MathOverflow))?;
        self.pending_request = Some(PendingRequest {
            request_id,
            round_id: self.round_id,
            requested_slot: current_slot,
        });
        self.state = RaffleState::Calculating;

        Ok(())
    }

    pub fn pending_for(&self, request_id: &[u8; 32]) -> Result<PendingRequest> {
        match self.pending_request {
            Some(p) if p.request_id == *request_id => Ok(p),
            _ => err!(RaffleError::UnknownRequest),
        }
    }

    /// Picks the weighted winner from `random_word`, books fee and prize and
    /// reopens the next round. The caller credits `prize` to the winner's ledger.
    pub fn settle(&mut self, random_word: &[u8; 32], now: i64) -> Result<Settlement> {
        require!(
            self.state == RaffleState::Calculating,
            RaffleError::UnknownRequest
        );
        let pending = self
            .pending_request
            .ok_or_else(|| error!(RaffleError::UnknownRequest))?;

        let ticket = winning_ticket(random_word, self.round_entries)?;
        let idx = pick_winner_index(self.participants.iter().map(|p| p.entries), ticket)?;
        let winner = self.participants[idx].player;

        let (fee, prize) = split_protocol_fee(self.round_value)?;
        let total_fee_collected = self
            .total_fee_collected
            .checked_add(fee)
            .ok_or_else(|| error!(RaffleError::MathOverflow))?;
        let next_round_id = self
            .round_id
            .checked_add(1)
            .ok_or_else(|| error!(RaffleError::MathOverflow))?;

        msg!(
            "Round {}: ticket {} of {} -> {}",
            pending.round_id,
            ticket,
            self.round_entries,
            winner
        );

        self.total_fee_collected = total_fee_collected;
        self.recent_winner = winner;

        self.participants.clear();
        self.round_entries = 0;
        self.round_value = 0;
        self.round_id = next_round_id;
        self.round_started_at = now;

        self.pending_request = None;
        self.state = RaffleState::Open;

        Ok(Settlement {
            round_id: pending.round_id,
            winner,
            prize,
            fee,
        })
    }

    // -----------------
    // Withdrawals
    // -----------------

    /// Zeroes the ledger's prize and releases it from custody.
    pub fn debit_prize(&mut self, ledger: &mut PlayerLedger) -> Result<u64> {
        require!(self.is_open(), RaffleError::NotOpen);
        require!(ledger.prize_owed > 0, RaffleError::NoPrize);

        let amount = ledger.prize_owed;
        self.release_value(amount)?;
        ledger.prize_owed = 0;

        Ok(amount)
    }

    pub fn debit_protocol_fee(&mut self) -> Result<u64> {
        require!(self.total_fee_collected > 0, RaffleError::NoFee);

        let amount = self.total_fee_collected;
        self.release_value(amount)?;
        self.total_fee_collected = 0;

        Ok(amount)
    }

    fn release_value(&mut self, amount: u64) -> Result<()> {
        self.total_value_held = self
            .total_value_held
            .checked_sub(amount)
            .ok_or_else(|| error!(RaffleError::MathOverflow))?;
        Ok(())
    }

    // -----------------
    // Guarded withdrawals
    // -----------------

    /// Takes the guard and debits `ledger` for a payout. A delegated payout
    /// also spends the one-shot flag. The caller transfers the returned amount,
    /// then calls `unlock`.
    pub fn begin_prize_withdrawal(&mut self, ledger: &mut PlayerLedger, delegated: bool) -> Result<u64> {
        require!(!self.locked, RaffleError::Reentrancy);
        if delegated {
            require!(
                self.delegated_withdraw_enabled,
                RaffleError::DelegatedWithdrawDisabled
            );
        }

        let amount = self.debit_prize(ledger)?;
        if delegated {
            self.delegated_withdraw_enabled = false;
        }
        self.locked = true;

        Ok(amount)
    }

    pub fn begin_fee_withdrawal(&mut self) -> Result<u64> {
        require!(!self.locked, RaffleError::Reentrancy);
        let amount = self.debit_protocol_fee()?;
        self.locked = true;
        Ok(amount)
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }
}

impl PlayerLedger {
    /// Cheap duplicate-entry check before the price feed is read.
    pub fn ensure_not_entered(&self, round_id: u64) -> Result<()> {
        require!(
            self.last_round_entered != round_id,
            RaffleError::AlreadyEntered
        );
        Ok(())
    }

    pub fn credit_prize(&mut self, amount: u64) -> Result<()> {
        self.prize_owed = self
            .prize_owed
            .checked_add(amount)
            .ok_or_else(|| error!(RaffleError::MathOverflow))?;
        self.rounds_won = self
            .rounds_won
            .checked_add(1)
            .ok_or_else(|| error!(RaffleError::MathOverflow))?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub const START: i64 = 1_700_000_000;
    pub const INTERVAL: i64 = 30;

    pub fn new_raffle() -> Raffle {
        Raffle {
            owner: Pubkey::new_unique(),
            pending_owner: Pubkey::default(),
            bump: 255,
            vault: Pubkey::new_unique(),
            vault_bump: 254,
            price_feed: Pubkey::new_unique(),
            randomness_coordinator: Pubkey::new_unique(),
            randomness_params: RandomnessParams {
                key_hash: [0u8; 32],
                request_confirmations: 3,
                num_words: 1,
                callback_compute_units: 200_000,
            },
            min_entrance_fee: 500_000_000,
            interval: INTERVAL,
            state: RaffleState::Open,
            round_id: INITIAL_ROUND_ID,
            round_started_at: START,
            participants: Vec::new(),
            round_entries: 0,
            round_value: 0,
            total_value_held: 0,
            total_fee_collected: 0,
            recent_winner: Pubkey::default(),
            pending_request: None,
            request_nonce: 0,
            delegated_withdraw_enabled: false,
            locked: false,
            version: INITIAL_VERSION,
        }
    }

    pub fn ledger_for(player: Pubkey) -> PlayerLedger {
        PlayerLedger {
            raffle: Pubkey::default(),
            player,
            bump: 255,
            prize_owed: 0,
            last_round_entered: 0,
            rounds_won: 0,
        }
    }
}
