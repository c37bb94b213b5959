pub mod gpg_keyring;
