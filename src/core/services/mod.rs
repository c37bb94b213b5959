pub mod packet_classifier;
pub mod signing_mechanism;
