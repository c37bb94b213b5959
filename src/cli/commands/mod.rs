pub mod detect;
pub mod fingerprints;
pub mod inspect;
pub mod keyring_helpers;
pub mod sign;
pub mod verify;
