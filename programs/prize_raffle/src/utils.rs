use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::Instruction;
use anchor_lang::solana_program::{program::invoke_signed, system_instruction};
use solana_sha256_hasher::hashv;

use crate::{constants::*, errors::RaffleError};

// Ed25519SigVerify111111111111111111111111111
pub fn ed25519_program_id() -> Pubkey {
    Pubkey::new_from_array([
        3, 125, 70, 214, 124, 147, 251, 190, 18, 249, 66, 143, 131, 141, 64, 255,
        5, 112, 116, 73, 39, 244, 138, 100, 252, 202, 112, 68, 128, 0, 0, 0,
    ])
}

// -----------------
// Seeds
// -----------------
pub const RAFFLE_SEED: &[u8] = b"raffle_v1";
pub const VAULT_SEED: &[u8] = b"vault_v1";
pub const PLAYER_SEED: &[u8] = b"player_v1";

const REQUEST_DOMAIN: &[u8] = b"prize-raffle:request_v1";
const FULFILL_DOMAIN: &[u8] = b"prize-raffle:fulfill_v1";

// -------------------------
// Entry math
// -------------------------

/// Splits an attached amount into whole entries and the refundable remainder.
pub fn entries_for_amount(amount: u64, unit_amount: u64) -> Result<(u64, u64)> {
    require!(unit_amount > 0, RaffleError::InvalidPrice);
    require!(amount >= unit_amount, RaffleError::InsufficientEntryAmount);

    let entries = amount / unit_amount;
    require!(entries <= MAX_ENTRIES_PER_PLAYER, RaffleError::TooManyEntries);

    Ok((entries, amount % unit_amount))
}

// -------------------------
// Weighted winner selection
// -------------------------

/// Reduces a 256-bit big-endian random word modulo `total_entries`.
pub fn winning_ticket(random_word: &[u8; 32], total_entries: u64) -> Result<u64> {
    require!(total_entries > 0, RaffleError::NoRoundEntries);

    let modulus = total_entries as u128;
    let ticket = random_word
        .iter()
        .fold(0u128, |acc, b| (acc * 256 + *b as u128) % modulus);

    Ok(ticket as u64)
}

/// Index of the first weight whose running sum exceeds `ticket`.
///
/// Falling off the end means the weights don't add up to the total the ticket
/// was drawn from, so this fails instead of returning a fallback.
pub fn pick_winner_index<I>(weights: I, ticket: u64) -> Result<usize>
where
    I: IntoIterator<Item = u64>,
{
    let mut cumulative: u64 = 0;
    for (i, w) in weights.into_iter().enumerate() {
        cumulative = cumulative
            .checked_add(w)
            .ok_or_else(|| error!(RaffleError::MathOverflow))?;
        if cumulative > ticket {
            return Ok(i);
        }
    }
    err!(RaffleError::WinnerSelectionFailed)
}

// -------------------------
// Fee split
// -------------------------

/// Returns `(fee, prize)` for a settled round value. Fee truncates toward zero.
pub fn split_protocol_fee(round_value: u64) -> Result<(u64, u64)> {
    let fee = (round_value as u128)
        .checked_mul(PROTOCOL_FEE_RATE)
        .ok_or_else(|| error!(RaffleError::MathOverflow))?
        / PRECISION;
    let fee = u64::try_from(fee).map_err(|_| error!(RaffleError::MathOverflow))?;

    let prize = round_value
        .checked_sub(fee)
        .ok_or_else(|| error!(RaffleError::MathOverflow))?;

    Ok((fee, prize))
}

// -------------------------
// Randomness request id + fulfill msg
// -------------------------
pub fn derive_request_id(
    program_id: &Pubkey,
    raffle: &Pubkey,
    round_id: u64,
    request_nonce: u64,
    key_hash: &[u8; 32],
    slot: u64,
) -> [u8; 32] {
    hashv(&[
        REQUEST_DOMAIN,
        program_id.as_ref(),
        raffle.as_ref(),
        round_id.to_le_bytes().as_ref(),
        request_nonce.to_le_bytes().as_ref(),
        key_hash.as_ref(),
        slot.to_le_bytes().as_ref(),
    ])
    .to_bytes()
}

pub fn expected_fulfill_msg(
    program_id: &Pubkey,
    raffle: &Pubkey,
    request_id: &[u8; 32],
    random_words: &[[u8; 32]],
) -> Vec<u8> {
    let mut out =
        Vec::with_capacity(FULFILL_DOMAIN.len() + 32 + 32 + 32 + 32 * random_words.len());
    out.extend_from_slice(FULFILL_DOMAIN);
    out.extend_from_slice(program_id.as_ref());
    out.extend_from_slice(raffle.as_ref());
    out.extend_from_slice(request_id);
    for w in random_words {
        out.extend_from_slice(w);
    }
    out
}

// -------------------------
// ed25519 parsing
// -------------------------
pub fn parse_ed25519_ix_pubkey_and_msg(ix: &Instruction) -> Result<(Pubkey, Vec<u8>)> {
    require!(
        ix.program_id == ed25519_program_id(),
        RaffleError::MissingOrInvalidEd25519Ix
    );

    let data = &ix.data;
    require!(data.len() >= 16, RaffleError::MissingOrInvalidEd25519Ix);

    let num_sigs = data[0];
    require!(num_sigs == 1, RaffleError::MissingOrInvalidEd25519Ix);

    // Offsets must point into this same instruction (instruction_index == u16::MAX)
    let sig_ix = u16::from_le_bytes([data[4], data[5]]);
    let pk_ix = u16::from_le_bytes([data[8], data[9]]);
    let msg_ix = u16::from_le_bytes([data[14], data[15]]);
    require!(sig_ix == u16::MAX, RaffleError::MissingOrInvalidEd25519Ix);
    require!(pk_ix == u16::MAX, RaffleError::MissingOrInvalidEd25519Ix);
    require!(msg_ix == u16::MAX, RaffleError::MissingOrInvalidEd25519Ix);

    let pk_off = u16::from_le_bytes([data[6], data[7]]) as usize;
    let msg_off = u16::from_le_bytes([data[10], data[11]]) as usize;
    let msg_sz = u16::from_le_bytes([data[12], data[13]]) as usize;

    require!(pk_off + 32 <= data.len(), RaffleError::MissingOrInvalidEd25519Ix);
    require!(msg_off + msg_sz <= data.len(), RaffleError::MissingOrInvalidEd25519Ix);

    let pk_bytes: [u8; 32] = data[pk_off..pk_off + 32]
        .try_into()
        .map_err(|_| error!(RaffleError::MissingOrInvalidEd25519Ix))?;
    let msg = data[msg_off..msg_off + msg_sz].to_vec();

    Ok((Pubkey::new_from_array(pk_bytes), msg))
}

pub fn assert_ed25519_ix_matches(
    ix: &Instruction,
    expected_pubkey: &Pubkey,
    expected_msg: &[u8],
) -> Result<()> {
    let (pk, msg) = parse_ed25519_ix_pubkey_and_msg(ix)?;

    require_keys_eq!(pk, *expected_pubkey, RaffleError::Ed25519PubkeyMismatch);
    require!(msg.as_slice() == expected_msg, RaffleError::Ed25519MessageMismatch);

    Ok(())
}

// -------------------------
// Vault transfers
// -------------------------

/// A delegated payout may go to any wallet except the null key or the
/// raffle's own accounts. Paying the vault would release custody while the
/// lamports stay put.
pub fn ensure_delegate_recipient(recipient: &Pubkey, raffle: &Pubkey, vault: &Pubkey) -> Result<()> {
    require!(*recipient != Pubkey::default(), RaffleError::InvalidRecipient);
    require_keys_neq!(*recipient, *raffle, RaffleError::InvalidRecipient);
    require_keys_neq!(*recipient, *vault, RaffleError::InvalidRecipient);
    Ok(())
}

/// Moves lamports out of the system-owned vault PDA. Any CPI failure is
/// reported as `on_fail`.
pub fn transfer_from_vault<'info>(
    vault: &AccountInfo<'info>,
    to: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    raffle: &Pubkey,
    vault_bump: u8,
    amount: u64,
    on_fail: RaffleError,
) -> Result<()> {
    let ix = system_instruction::transfer(vault.key, to.key, amount);
    let signer_seeds: &[&[u8]] = &[VAULT_SEED, raffle.as_ref(), &[vault_bump]];

    invoke_signed(
        &ix,
        &[vault.clone(), to.clone(), system_program.clone()],
        &[signer_seeds],
    )
    .map_err(|_| error!(on_fail))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expect_err<T: std::fmt::Debug>(res: Result<T>, expected: RaffleError) {
        let expected: anchor_lang::error::Error = expected.into();
        assert_eq!(res.unwrap_err(), expected);
    }

    fn word_from_u64(v: u64) -> [u8; 32] {
        let mut w = [0u8; 32];
        w[24..].copy_from_slice(&v.to_be_bytes());
        w
    }

    #[test]
    fn entries_keep_remainder_as_refund() {
        // unit = 100, 250 sent -> 2 entries, 50 back
        assert_eq!(entries_for_amount(250, 100).unwrap(), (2, 50));
        assert_eq!(entries_for_amount(100, 100).unwrap(), (1, 0));
        assert_eq!(entries_for_amount(599, 100).unwrap(), (5, 99));
    }

    #[test]
    fn entries_reject_below_unit_and_over_cap() {
        expect_err(entries_for_amount(99, 100), RaffleError::InsufficientEntryAmount);
        expect_err(entries_for_amount(600, 100), RaffleError::TooManyEntries);
        expect_err(entries_for_amount(600, 0), RaffleError::InvalidPrice);
    }

    #[test]
    fn winning_ticket_reduces_full_word() {
        assert_eq!(winning_ticket(&word_from_u64(550), 600).unwrap(), 550);
        assert_eq!(winning_ticket(&word_from_u64(1_205), 600).unwrap(), 5);

        // 2^255 mod 7: 2^3 = 1 (mod 7), 255 = 3*85 -> 1
        let mut high = [0u8; 32];
        high[0] = 0x80;
        assert_eq!(winning_ticket(&high, 7).unwrap(), 1);

        assert_eq!(winning_ticket(&[0xff; 32], 1).unwrap(), 0);
        expect_err(winning_ticket(&[0u8; 32], 0), RaffleError::NoRoundEntries);
    }

    #[test]
    fn pick_winner_uses_first_cumulative_above_ticket() {
        // cumulative 100, 300, 600; ticket 550 lands on the third weight
        assert_eq!(pick_winner_index([100, 200, 300], 550).unwrap(), 2);
        assert_eq!(pick_winner_index([100, 200, 300], 99).unwrap(), 0);
        assert_eq!(pick_winner_index([100, 200, 300], 100).unwrap(), 1);
        assert_eq!(pick_winner_index([100, 200, 300], 299).unwrap(), 1);

        // same round in entries: cumulative 1, 3, 6
        assert_eq!(pick_winner_index([1, 2, 3], 5).unwrap(), 2);
    }

    #[test]
    fn pick_winner_fails_when_ticket_uncovered() {
        expect_err(pick_winner_index([1, 2, 3], 6), RaffleError::WinnerSelectionFailed);
        expect_err(pick_winner_index(Vec::<u64>::new(), 0), RaffleError::WinnerSelectionFailed);
    }

    #[test]
    fn every_ticket_maps_to_exactly_its_owner_weight() {
        let weights = [3u64, 1, 5, 2, 4];
        let total: u64 = weights.iter().sum();
        let mut wins = [0u64; 5];

        for ticket in 0..total {
            let idx = pick_winner_index(weights, ticket).unwrap();
            wins[idx] += 1;
        }

        assert_eq!(wins, weights);
    }

    #[test]
    fn fee_split_is_five_percent_truncated() {
        assert_eq!(split_protocol_fee(600).unwrap(), (30, 570));
        assert_eq!(split_protocol_fee(19).unwrap(), (0, 19));
        assert_eq!(split_protocol_fee(39).unwrap(), (1, 38));
        assert_eq!(split_protocol_fee(0).unwrap(), (0, 0));

        let (fee, prize) = split_protocol_fee(u64::MAX).unwrap();
        assert_eq!(fee + prize, u64::MAX);
        assert_eq!(fee, u64::MAX / 20);
    }

    #[test]
    fn request_ids_differ_per_nonce() {
        let program = Pubkey::new_unique();
        let raffle = Pubkey::new_unique();
        let key_hash = [7u8; 32];

        let a = derive_request_id(&program, &raffle, 1, 0, &key_hash, 100);
        let b = derive_request_id(&program, &raffle, 1, 1, &key_hash, 100);
        let again = derive_request_id(&program, &raffle, 1, 0, &key_hash, 100);

        assert_ne!(a, b);
        assert_eq!(a, again);
    }

    #[test]
    fn fulfill_msg_binds_request_and_words() {
        let program = Pubkey::new_unique();
        let raffle = Pubkey::new_unique();
        let request_id = [1u8; 32];
        let words = [[2u8; 32], [3u8; 32]];

        let msg = expected_fulfill_msg(&program, &raffle, &request_id, &words);
        assert_eq!(msg.len(), FULFILL_DOMAIN.len() + 32 * 5);
        assert!(msg.starts_with(FULFILL_DOMAIN));
        assert_eq!(&msg[msg.len() - 32..], &[3u8; 32]);

        let other = expected_fulfill_msg(&program, &raffle, &[9u8; 32], &words);
        assert_ne!(msg, other);
    }

    /// Builds ed25519 program instruction data with the standard layout:
    /// [num_sigs: u8, padding: u8, offsets(14 bytes), signature(64), pubkey(32), msg(N)]
    ///
    /// The signature is left zeroed; only the parser is under test.
    fn make_ed25519_ix(pubkey: [u8; 32], msg: &[u8], sig_ix: u16, pk_ix: u16, msg_ix: u16) -> Instruction {
        let header_len: usize = 2 + 14;
        let sig_off: u16 = header_len as u16;
        let pk_off: u16 = sig_off + 64;
        let msg_off: u16 = pk_off + 32;
        let msg_sz: u16 = msg.len().try_into().expect("message too long for test");

        let mut data = vec![0u8; header_len + 64 + 32 + msg.len()];
        data[0] = 1;

        let o = 2usize;
        data[o..o + 2].copy_from_slice(&sig_off.to_le_bytes());
        data[o + 2..o + 4].copy_from_slice(&sig_ix.to_le_bytes());
        data[o + 4..o + 6].copy_from_slice(&pk_off.to_le_bytes());
        data[o + 6..o + 8].copy_from_slice(&pk_ix.to_le_bytes());
        data[o + 8..o + 10].copy_from_slice(&msg_off.to_le_bytes());
        data[o + 10..o + 12].copy_from_slice(&msg_sz.to_le_bytes());
        data[o + 12..o + 14].copy_from_slice(&msg_ix.to_le_bytes());

        let pk_start = pk_off as usize;
        let msg_start = msg_off as usize;
        data[pk_start..pk_start + 32].copy_from_slice(&pubkey);
        data[msg_start..msg_start + msg.len()].copy_from_slice(msg);

        Instruction {
            program_id: ed25519_program_id(),
            accounts: vec![],
            data,
        }
    }

    #[test]
    fn ed25519_accepts_signed_fulfill_msg() {
        let coordinator = Pubkey::new_unique();
        let msg = expected_fulfill_msg(&Pubkey::new_unique(), &Pubkey::new_unique(), &[4u8; 32], &[[5u8; 32]]);

        let ix = make_ed25519_ix(coordinator.to_bytes(), &msg, u16::MAX, u16::MAX, u16::MAX);

        let (pk, parsed) = parse_ed25519_ix_pubkey_and_msg(&ix).expect("should parse");
        assert_eq!(pk, coordinator);
        assert_eq!(parsed, msg);
        assert!(assert_ed25519_ix_matches(&ix, &coordinator, &msg).is_ok());
    }

    #[test]
    fn ed25519_rejects_external_offsets() {
        let coordinator = Pubkey::new_unique();
        let msg = b"words".to_vec();

        for (s, p, m) in [(0, u16::MAX, u16::MAX), (u16::MAX, 1, u16::MAX), (u16::MAX, u16::MAX, 7)] {
            let ix = make_ed25519_ix(coordinator.to_bytes(), &msg, s, p, m);
            expect_err(
                parse_ed25519_ix_pubkey_and_msg(&ix),
                RaffleError::MissingOrInvalidEd25519Ix,
            );
        }
    }

    #[test]
    fn delegate_recipient_excludes_null_and_raffle_accounts() {
        let raffle = Pubkey::new_unique();
        let vault = Pubkey::new_unique();

        ensure_delegate_recipient(&Pubkey::new_unique(), &raffle, &vault).unwrap();
        expect_err(
            ensure_delegate_recipient(&Pubkey::default(), &raffle, &vault),
            RaffleError::InvalidRecipient,
        );
        expect_err(
            ensure_delegate_recipient(&vault, &raffle, &vault),
            RaffleError::InvalidRecipient,
        );
        expect_err(
            ensure_delegate_recipient(&raffle, &raffle, &vault),
            RaffleError::InvalidRecipient,
        );
    }

    #[test]
    fn ed25519_rejects_wrong_signer_or_msg() {
        let coordinator = Pubkey::new_unique();
        let msg = b"good".to_vec();
        let ix = make_ed25519_ix(coordinator.to_bytes(), &msg, u16::MAX, u16::MAX, u16::MAX);

        expect_err(
            assert_ed25519_ix_matches(&ix, &Pubkey::new_unique(), &msg),
            RaffleError::Ed25519PubkeyMismatch,
        );
        expect_err(
            assert_ed25519_ix_matches(&ix, &coordinator, b"bad"),
            RaffleError::Ed25519MessageMismatch,
        );

        let mut wrong_program = ix.clone();
        wrong_program.program_id = Pubkey::new_unique();
        expect_err(
            parse_ed25519_ix_pubkey_and_msg(&wrong_program),
            RaffleError::MissingOrInvalidEd25519Ix,
        );
    }
}
