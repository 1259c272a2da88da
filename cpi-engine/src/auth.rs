// Copyright (c) 2026 The CPI Project Developers
// SPDX-License-Identifier: MIT
// Project: CPI
// Module: cpi-engine::auth

//! Operator command authentication.
//!
//! The integrity code is a deliberately weak, demonstration-only
//! checksum standing in for a real message-authentication mechanism. It
//! is defined here and nowhere else: every producer of commands,
//! including demonstration fixtures, goes through [`integrity_code`].

use std::collections::BTreeSet;

use crate::model::OperatorCommand;

/// Two-uppercase-hex-digit checksum over `user_id + "|" + action`.
///
/// Sum of the Unicode scalar values of the payload, modulo 256.
pub fn integrity_code(user_id: &str, action: &str) -> String {
    let payload = format!("{user_id}|{action}");
    let sum = payload
        .chars()
        .fold(0u32, |acc, c| acc.wrapping_add(c as u32));
    format!("{:02X}", sum & 0xFF)
}

/// Whether a command passes both the authorization and integrity checks.
///
/// The user id must be present in `authorized_users` (case-sensitive)
/// and the presented integrity code must match the computed one
/// (case-insensitive). Any failure invalidates the whole command; there
/// is no partial credit. Pure, no side effects.
pub fn is_valid(cmd: &OperatorCommand, authorized_users: &BTreeSet<String>) -> bool {
    if !authorized_users.contains(&cmd.user_id) {
        return false;
    }
    let expected = integrity_code(&cmd.user_id, cmd.action.as_str());
    expected.eq_ignore_ascii_case(&cmd.integrity_code)
}
