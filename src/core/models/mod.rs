pub mod decoded_message;
pub mod key_store;
pub mod packet_class;
pub mod signature_contents;
