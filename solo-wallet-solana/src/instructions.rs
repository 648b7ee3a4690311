//! Transfer instruction builders

use solana_sdk::{instruction::Instruction, pubkey::Pubkey, system_instruction};
use spl_associated_token_account::{get_associated_token_address, instruction as associated_token_instruction};
use spl_token::instruction as token_instruction;

use solo_wallet::error::{Error, Result};

/// Native SOL transfer
pub fn native_transfer(from: &Pubkey, to: &Pubkey, lamports: u64) -> Instruction {
    system_instruction::transfer(from, to, lamports)
}

/// Token transfer between the associated token accounts of `owner` and `receiver`.
///
/// When `create_destination` is set the receiver's associated token account is
/// created first, paid for by `owner`.
pub fn token_transfer(
    owner: &Pubkey,
    mint: &Pubkey,
    receiver: &Pubkey,
    amount: u64,
    decimals: u8,
    create_destination: bool,
) -> Result<Vec<Instruction>> {
    let source = get_associated_token_address(owner, mint);
    let destination = get_associated_token_address(receiver, mint);

    let mut instructions = Vec::with_capacity(2);

    if create_destination {
        instructions.push(associated_token_instruction::create_associated_token_account(
            owner,
            receiver,
            mint,
            &spl_token::id(),
        ));
    }

    let transfer_ix = token_instruction::transfer_checked(
        &spl_token::id(),
        &source,
        mint,
        &destination,
        owner,
        &[],
        amount,
        decimals,
    ).map_err(|e| Error::Transaction(format!("Failed to create token transfer instruction: {}", e)))?;

    instructions.push(transfer_ix);

    Ok(instructions)
}
