use anchor_lang::prelude::*;
use anchor_lang::solana_program::sysvar::instructions::{
    load_current_index_checked, load_instruction_at_checked,
};

use crate::{
    errors::RaffleError,
    events::WinnerPicked,
    state::{PlayerLedger, Raffle, Settlement},
    utils::{assert_ed25519_ix_matches, expected_fulfill_msg},
    FulfillRandomWords,
};

#[cfg(feature = "mock-randomness")]
use crate::FulfillRandomWordsMock;

/// Consumes the first random word of the outstanding request: settles the
/// round and credits the prize. Leaves both accounts untouched on error.
pub fn fulfill_core(
    raffle: &mut Raffle,
    winner_ledger: &mut PlayerLedger,
    request_id: &[u8; 32],
    random_words: &[[u8; 32]],
    current_slot: u64,
    now: i64,
) -> Result<Settlement> {
    let pending = raffle.pending_for(request_id)?;

    let params = raffle.randomness_params;
    require!(
        !random_words.is_empty() && random_words.len() == params.num_words as usize,
        RaffleError::InvalidRandomWords
    );

    let ready_slot = pending
        .requested_slot
        .checked_add(params.request_confirmations as u64)
        .ok_or_else(|| error!(RaffleError::MathOverflow))?;
    require!(current_slot >= ready_slot, RaffleError::RandomnessNotReady);

    let mut next = raffle.clone();
    let settlement = next.settle(&random_words[0], now)?;

    require_keys_eq!(
        winner_ledger.player,
        settlement.winner,
        RaffleError::WinnerLedgerMismatch
    );
    winner_ledger.credit_prize(settlement.prize)?;

    *raffle = next;
    Ok(settlement)
}

fn emit_winner(settlement: &Settlement) {
    emit!(WinnerPicked {
        round_id: settlement.round_id,
        winner: settlement.winner,
        prize: settlement.prize,
        fee: settlement.fee,
    });
}

// Tx layout must be: [ ed25519_verify, fulfill_random_words ]
pub fn fulfill_random_words(
    ctx: Context<FulfillRandomWords>,
    request_id: [u8; 32],
    random_words: Vec<[u8; 32]>,
) -> Result<()> {
    let clock = Clock::get()?;
    let raffle_key = ctx.accounts.raffle.key();

    // --- ed25519 introspection ---
    let ix_sys = ctx.accounts.instructions.to_account_info();
    let current_ix = load_current_index_checked(&ix_sys)? as usize;
    require!(current_ix >= 1, RaffleError::MissingOrInvalidEd25519Ix);

    let ed_ix = load_instruction_at_checked(current_ix - 1, &ix_sys)
        .map_err(|_| error!(RaffleError::MissingOrInvalidEd25519Ix))?;

    let expected = expected_fulfill_msg(ctx.program_id, &raffle_key, &request_id, &random_words);
    assert_ed25519_ix_matches(
        &ed_ix,
        &ctx.accounts.raffle.randomness_coordinator,
        expected.as_slice(),
    )?;

    let settlement = fulfill_core(
        &mut ctx.accounts.raffle,
        &mut ctx.accounts.winner_ledger,
        &request_id,
        &random_words,
        clock.slot,
        clock.unix_timestamp,
    )?;

    emit_winner(&settlement);
    Ok(())
}

#[cfg(feature = "mock-randomness")]
pub fn fulfill_random_words_mock(
    ctx: Context<FulfillRandomWordsMock>,
    request_id: [u8; 32],
    random_words: Vec<[u8; 32]>,
) -> Result<()> {
    require_keys_eq!(
        ctx.accounts.raffle.randomness_coordinator,
        ctx.accounts.coordinator.key(),
        RaffleError::Unauthorized
    );

    let clock = Clock::get()?;
    let settlement = fulfill_core(
        &mut ctx.accounts.raffle,
        &mut ctx.accounts.winner_ledger,
        &request_id,
        &random_words,
        clock.slot,
        clock.unix_timestamp,
    )?;

    emit_winner(&settlement);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::fixtures::*;
    use crate::state::RaffleState;

    const REQUEST: [u8; 32] = [42u8; 32];
    const SLOT: u64 = 1_000;

    fn expect_err<T: std::fmt::Debug>(res: Result<T>, expected: RaffleError) {
        let expected: anchor_lang::error::Error = expected.into();
        assert_eq!(res.unwrap_err(), expected);
    }

    fn calculating_raffle(players: &[Pubkey]) -> Raffle {
        let mut raffle = new_raffle();
        for p in players {
            raffle.record_entry(*p, 2, 100).unwrap();
        }
        let due = START + INTERVAL + 1;
        raffle
            .begin_calculating(due, raffle.total_value_held, REQUEST, SLOT)
            .unwrap();
        raffle
    }

    #[test]
    fn credits_selected_winner() {
        let players = [Pubkey::new_unique(), Pubkey::new_unique()];
        let mut raffle = calculating_raffle(&players);
        let mut ledger = ledger_for(players[1]);

        // ticket 3 of 4 -> cumulative 2, 4 -> second player
        let mut word = [0u8; 32];
        word[31] = 3;

        let ready = SLOT + raffle.randomness_params.request_confirmations as u64;
        let s = fulfill_core(&mut raffle, &mut ledger, &REQUEST, &[word], ready, START).unwrap();

        assert_eq!(s.winner, players[1]);
        assert_eq!((s.prize, s.fee), (380, 20));
        assert_eq!(ledger.prize_owed, 380);
        assert_eq!(raffle.state, RaffleState::Open);
        assert_eq!(raffle.round_id, 2);
    }

    #[test]
    fn rejects_unknown_or_repeated_request() {
        let players = [Pubkey::new_unique()];
        let mut raffle = calculating_raffle(&players);
        let mut ledger = ledger_for(players[0]);
        let ready = SLOT + 10;

        expect_err(
            fulfill_core(&mut raffle, &mut ledger, &[1u8; 32], &[[0u8; 32]], ready, START),
            RaffleError::UnknownRequest,
        );

        fulfill_core(&mut raffle, &mut ledger, &REQUEST, &[[0u8; 32]], ready, START).unwrap();
        expect_err(
            fulfill_core(&mut raffle, &mut ledger, &REQUEST, &[[0u8; 32]], ready, START),
            RaffleError::UnknownRequest,
        );
        assert_eq!(ledger.prize_owed, 190);
    }

    #[test]
    fn rejects_early_or_malformed_delivery() {
        let players = [Pubkey::new_unique()];
        let mut raffle = calculating_raffle(&players);
        let mut ledger = ledger_for(players[0]);

        expect_err(
            fulfill_core(&mut raffle, &mut ledger, &REQUEST, &[[0u8; 32]], SLOT + 2, START),
            RaffleError::RandomnessNotReady,
        );
        expect_err(
            fulfill_core(&mut raffle, &mut ledger, &REQUEST, &[], SLOT + 3, START),
            RaffleError::InvalidRandomWords,
        );
        expect_err(
            fulfill_core(&mut raffle, &mut ledger, &REQUEST, &[[0u8; 32], [1u8; 32]], SLOT + 3, START),
            RaffleError::InvalidRandomWords,
        );
        assert_eq!(raffle.state, RaffleState::Calculating);
    }

    #[test]
    fn wrong_winner_ledger_leaves_round_untouched() {
        let players = [Pubkey::new_unique(), Pubkey::new_unique()];
        let mut raffle = calculating_raffle(&players);
        let mut wrong = ledger_for(players[1]);

        // ticket 0 -> first player
        let res = fulfill_core(&mut raffle, &mut wrong, &REQUEST, &[[0u8; 32]], SLOT + 3, START);
        expect_err(res, RaffleError::WinnerLedgerMismatch);

        assert_eq!(wrong.prize_owed, 0);
        assert_eq!(raffle.state, RaffleState::Calculating);
        assert_eq!(raffle.round_id, 1);
        assert_eq!(raffle.participants.len(), 2);
        assert_eq!(raffle.total_fee_collected, 0);
        assert!(raffle.pending_request.is_some());
    }
}
