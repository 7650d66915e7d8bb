//! Identifier and key-pair name generation.
//!
//! Every entity is addressed by a prefixed random id that is assigned once at
//! creation time and never changes afterwards.

use chrono::{DateTime, Utc};

const ID_ALPHABET: [char; 36] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e',
    'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't',
    'u', 'v', 'w', 'x', 'y', 'z',
];

pub const ID_SUFFIX_LEN: usize = 10;

pub const CONNECTOR_ID_PREFIX: &str = "con_";
pub const IMAGE_ID_PREFIX: &str = "img_";
pub const RUNNER_ID_PREFIX: &str = "run_";

pub fn generate_id(prefix: &str) -> String {
    format!("{}{}", prefix, nanoid::nanoid!(ID_SUFFIX_LEN, &ID_ALPHABET))
}

pub fn connector_id() -> String {
    generate_id(CONNECTOR_ID_PREFIX)
}

pub fn image_id() -> String {
    generate_id(IMAGE_ID_PREFIX)
}

pub fn runner_id() -> String {
    generate_id(RUNNER_ID_PREFIX)
}

/// Key pairs are rotated daily, so the name only carries the UTC date.
pub fn key_pair_name(at: DateTime<Utc>) -> String {
    format!("KeyPair-{}", at.format("%Y-%m-%d"))
}
